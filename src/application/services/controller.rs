use std::sync::Arc;

use tokio::sync::{watch, Notify};

use crate::domain::ports::change_feed::ChangeFeed;
use crate::domain::ports::presenter::Presenter;

use super::aggregator::NotificationAggregator;
use super::classifier::AlertClassifier;
use super::session::NotificationSession;

/// An authenticated user session. Notifications only flow while one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
}

impl AuthSession {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Ties notification sessions to the authentication state.
///
/// Signing in starts a session with a fresh, empty log; signing out (or a
/// different user signing in) tears the running one down first. Teardown
/// aborts in-flight work; [`SessionController::finish`] drains it instead.
pub struct SessionController {
    feed: Arc<dyn ChangeFeed>,
    classifier: Arc<AlertClassifier>,
    presenter: Arc<dyn Presenter>,
    buffer: usize,
    active: watch::Sender<Option<Arc<NotificationAggregator>>>,
    finish: Notify,
}

impl SessionController {
    #[must_use]
    pub fn new(
        feed: Arc<dyn ChangeFeed>,
        classifier: Arc<AlertClassifier>,
        presenter: Arc<dyn Presenter>,
        buffer: usize,
    ) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            feed,
            classifier,
            presenter,
            buffer,
            active,
            finish: Notify::new(),
        }
    }

    /// Aggregator of the running session, `None` while signed out.
    #[must_use]
    pub fn active(&self) -> watch::Receiver<Option<Arc<NotificationAggregator>>> {
        self.active.subscribe()
    }

    /// Asks [`SessionController::run`] to stop once the running session has
    /// recorded everything its feeds delivered. The feeds must be closed (or
    /// about to close) for this to complete.
    pub fn finish(&self) {
        self.finish.notify_one();
    }

    /// Follows `auth` until its sender is dropped, then tears down whatever
    /// session is still running. Returns early after a drain requested via
    /// [`SessionController::finish`].
    pub async fn run(&self, mut auth: watch::Receiver<Option<AuthSession>>) {
        let mut current: Option<(String, NotificationSession)> = None;

        loop {
            let wanted = auth.borrow_and_update().as_ref().map(|s| s.user_id.clone());
            let running = current.as_ref().map(|(user, _)| user.clone());

            if wanted != running {
                if let Some((user, session)) = current.take() {
                    self.teardown(&user, session).await;
                }
                if let Some(user) = wanted {
                    current = self.start(user).await;
                }
            }

            tokio::select! {
                changed = auth.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                () = self.finish.notified() => {
                    if let Some((user, session)) = current.take() {
                        session.drain().await;
                        self.active.send_replace(None);
                        tracing::info!("Notifications drained for {user}");
                    }
                    return;
                }
            }
        }

        if let Some((user, session)) = current.take() {
            self.teardown(&user, session).await;
        }
    }

    async fn start(&self, user: String) -> Option<(String, NotificationSession)> {
        let aggregator = Arc::new(NotificationAggregator::new(Arc::clone(&self.presenter)));
        match NotificationSession::start(
            &*self.feed,
            Arc::clone(&self.classifier),
            Arc::clone(&aggregator),
            self.buffer,
        )
        .await
        {
            Ok(session) => {
                tracing::info!("Notifications live for {user}");
                self.active.send_replace(Some(aggregator));
                Some((user, session))
            }
            Err(e) => {
                tracing::error!("Could not subscribe to change feeds for {user}: {e}");
                None
            }
        }
    }

    async fn teardown(&self, user: &str, session: NotificationSession) {
        session.shutdown().await;
        self.active.send_replace(None);
        tracing::info!("Notifications stopped for {user}");
    }
}
