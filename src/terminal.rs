use feed::{
    Field, Intent, Intersection, ManualViewport, RegionId, Render, ViewModel,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt as _},
    sync::mpsc::Sender,
};
use tracing::warn;

pub const SENTINEL: RegionId = RegionId(0);

/// Prints each frame to stdout.
pub struct Terminal;

impl Render for Terminal {
    fn render(&mut self, model: &ViewModel<'_>) {
        let mut out = std::io::stdout().lock();
        let _ = write_frame(&mut out, model);
    }
}

fn write_frame(
    out: &mut impl std::io::Write,
    model: &ViewModel<'_>,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "== 경소고 대나무숲 == [{}]",
        model.theme.toggle_label()
    )?;

    let draft = model.draft;
    writeln!(
        out,
        "form: title={:?} name={:?} tag={} description={:?}",
        draft.title,
        draft.name,
        draft.category.map(|c| c.to_string()).unwrap_or("태그 선택".into()),
        draft.description,
    )?;
    if model.is_submitting {
        writeln!(out, "제보 중...")?;
    }
    if model.is_submitted {
        writeln!(out, "제보가 성공적으로 완료되었습니다!")?;
    }
    if let Some(err) = model.submit_error {
        writeln!(out, "submit failed: {}", err)?;
    }
    if let Some(err) = model.fetch_error {
        writeln!(out, "refresh failed: {}", err)?;
    }

    for post in model.posts {
        writeln!(
            out,
            "#{} [{}] {} - {} ({})",
            post.id,
            post.categories,
            post.title,
            post.name,
            post.created_at.format("%Y-%m-%d %H:%M"),
        )?;
        writeln!(out, "    {}", post.description)?;
    }
    writeln!(
        out,
        "-- {}/{} shown{} --",
        model.posts.len(),
        model.total,
        if model.has_more { ", scroll for more" } else { "" }
    )?;
    out.flush()
}

/// Reads commands line by line and turns them into intents:
/// `scroll`, `refresh`, `theme`, `set <field> <value>`, `submit`, `quit`.
/// Stops reading once the view is asked to unmount.
pub async fn read_commands(
    input: impl AsyncBufRead + Unpin,
    viewport: ManualViewport,
    intents: Sender<Intent>,
) -> anyhow::Result<()> {
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        let batch = match command {
            "" => continue,
            "scroll" => scroll(&viewport),
            "refresh" => vec![Intent::Refresh],
            "theme" => vec![Intent::ToggleTheme],
            "submit" => vec![Intent::Submit],
            "quit" | "exit" => {
                let _ = intents.send(Intent::Unmount).await;
                return Ok(());
            }
            "set" => {
                let (id, value) = rest.split_once(' ').unwrap_or((rest, ""));
                match Field::from_id(id) {
                    Some(field) => vec![Intent::Edit(field, value.to_string())],
                    None => {
                        warn!(task = "read command", unknown_field = id);
                        continue;
                    }
                }
            }
            other => {
                warn!(task = "read command", unknown_command = other);
                continue;
            }
        };

        for intent in batch {
            if intents.send(intent).await.is_err() {
                return Ok(());
            }
        }
    }

    let _ = intents.send(Intent::Unmount).await;
    Ok(())
}

/// The sentinel leaves the screen and comes back fully into view.
fn scroll(viewport: &ManualViewport) -> Vec<Intent> {
    viewport
        .handles_for(SENTINEL)
        .into_iter()
        .flat_map(|handle| {
            [
                Intent::Intersection(Intersection { handle, ratio: 0.0 }),
                Intent::Intersection(Intersection { handle, ratio: 1.0 }),
            ]
        })
        .collect()
}

#[cfg(test)]
mod test {
    use feed::{Draft, Theme};

    use super::*;

    #[test]
    fn test_write_frame() {
        // Arrange
        let draft = Draft::default();
        let model = ViewModel {
            posts: &[],
            has_more: false,
            total: 0,
            draft: &draft,
            is_submitting: false,
            is_submitted: true,
            fetch_error: Some("down"),
            submit_error: None,
            theme: Theme::Dark,
        };
        let mut out = vec![];

        // Act
        write_frame(&mut out, &model).unwrap();

        // Assert
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[밝은 테마]"));
        assert!(text.contains("태그 선택"));
        assert!(text.contains("제보가 성공적으로 완료되었습니다!"));
        assert!(text.contains("refresh failed: down"));
        assert!(text.contains("-- 0/0 shown --"));
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        // Arrange
        let input: &[u8] = b"theme\nquit\ntheme\n";
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);

        // Act
        read_commands(input, ManualViewport::default(), tx).await.unwrap();

        // Assert
        assert_eq!(rx.recv().await, Some(Intent::ToggleTheme));
        assert_eq!(rx.recv().await, Some(Intent::Unmount));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_end_of_input_unmounts() {
        let input: &[u8] = "set categories 기타\n".as_bytes();
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);

        read_commands(input, ManualViewport::default(), tx).await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(Intent::Edit(Field::Categories, "기타".to_string()))
        );
        assert_eq!(rx.recv().await, Some(Intent::Unmount));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_scroll_without_sentinel_is_empty() {
        let viewport = ManualViewport::default();

        assert!(scroll(&viewport).is_empty());
    }
}
