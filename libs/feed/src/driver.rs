use std::sync::Arc;

use board_client::{BoardClientError, Boards};
use entity::prelude::*;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info};

use crate::{
    submission::Field,
    view::{FeedView, FetchTicket, ViewModel},
    viewport::{Intersection, RegionId, Viewport},
};

/// User and platform input for a mounted view.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Refresh,
    AttachSentinel(RegionId),
    DetachSentinel,
    Intersection(Intersection),
    ToggleTheme,
    Edit(Field, String),
    Submit,
    Unmount,
}

pub trait Render {
    fn render(&mut self, model: &ViewModel<'_>);
}

enum Completion {
    Fetched(FetchTicket, Result<Vec<PostEntity>, BoardClientError>),
    Created(Result<PostEntity, BoardClientError>),
}

/// Runs one view until `Intent::Unmount` or until the intent channel
/// closes, then tears it down and hands it back.
///
/// The view is only touched from this loop. Network calls are spawned and
/// report back through a channel, so a result that arrives after the loop
/// ends has nowhere to go and is dropped.
pub async fn run<V, B, R>(
    mut view: FeedView<V>,
    boards: Arc<B>,
    mut intents: Receiver<Intent>,
    renderer: &mut R,
) -> FeedView<V>
where
    V: Viewport,
    B: Boards + Send + Sync + 'static,
    R: Render,
{
    info!(task = "mount feed view");
    let (tx, mut rx) = mpsc::channel::<Completion>(16);

    spawn_fetch(&mut view, &boards, &tx);
    renderer.render(&view.snapshot());

    loop {
        tokio::select! {
            intent = intents.recv() => {
                let Some(intent) = intent else {
                    break;
                };
                if intent == Intent::Unmount {
                    break;
                }
                handle_intent(&mut view, &boards, &tx, intent);
            }
            Some(completion) = rx.recv() => match completion {
                Completion::Fetched(ticket, result) => {
                    view.apply_fetch(ticket, result);
                }
                Completion::Created(result) => {
                    // failures are logged and kept by the reconciler
                    let _ = view.finish_submit(result);
                }
            },
        }
        renderer.render(&view.snapshot());
    }

    view.teardown();
    info!(task = "unmount feed view");
    view
}

fn handle_intent<V, B>(
    view: &mut FeedView<V>,
    boards: &Arc<B>,
    tx: &Sender<Completion>,
    intent: Intent,
) where
    V: Viewport,
    B: Boards + Send + Sync + 'static,
{
    match intent {
        Intent::Refresh => spawn_fetch(view, boards, tx),
        Intent::AttachSentinel(region) => view.attach_sentinel(region),
        Intent::DetachSentinel => view.detach_sentinel(),
        Intent::Intersection(entry) => {
            view.on_intersection(entry);
        }
        Intent::ToggleTheme => view.toggle_theme(),
        Intent::Edit(field, value) => {
            // rejections are logged and kept by the reconciler
            let _ = view.set_field(field, &value);
        }
        Intent::Submit => {
            if let Ok(post) = view.begin_submit() {
                spawn_create(post, boards, tx);
            }
        }
        Intent::Unmount => {}
    }
}

fn spawn_fetch<V, B>(
    view: &mut FeedView<V>,
    boards: &Arc<B>,
    tx: &Sender<Completion>,
) where
    V: Viewport,
    B: Boards + Send + Sync + 'static,
{
    let ticket = view.begin_fetch();
    let boards = boards.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let result = boards.fetch_all().await;
        if tx.send(Completion::Fetched(ticket, result)).await.is_err() {
            debug!(task = "fetch all posts", reason = "view is gone");
        }
    });
}

fn spawn_create<B>(post: NewPostEntity, boards: &Arc<B>, tx: &Sender<Completion>)
where
    B: Boards + Send + Sync + 'static,
{
    let boards = boards.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let result = boards.create(post).await;
        if tx.send(Completion::Created(result)).await.is_err() {
            debug!(task = "create post", reason = "view is gone");
        }
    });
}
