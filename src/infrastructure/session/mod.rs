//! Bot session shell - protocol lifecycle glue.
//!
//! Connects, joins the room, then pumps message events into the
//! dispatcher. Each event gets its own task, with the synchronous dispatch
//! (which may block on upstream HTTP) on a blocking worker, so one slow
//! external call never stalls other users' commands.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::errors::BotError;
use crate::application::messaging::Dispatcher;
use crate::domain::traits::Transport;
use crate::infrastructure::config::Config;

pub struct BotSession<T: Transport + 'static> {
    transport: Arc<T>,
    dispatcher: Arc<Dispatcher>,
    config: Config,
}

impl<T: Transport + 'static> BotSession<T> {
    pub fn new(transport: Arc<T>, dispatcher: Arc<Dispatcher>, config: Config) -> Self {
        Self {
            transport,
            dispatcher,
            config,
        }
    }

    /// Run until the transport closes its event stream. Connect and join
    /// failures are fatal and bubble up to the caller.
    pub async fn run(&self) -> Result<(), BotError> {
        self.transport
            .connect(&self.config.jid, &self.config.password)
            .await?;
        self.transport
            .join_room(&self.config.room, &self.config.nick)
            .await?;
        info!(room = %self.config.room, nick = %self.config.nick, "joined room");

        while let Some(event) = self.transport.recv().await? {
            let dispatcher = Arc::clone(&self.dispatcher);
            let transport = Arc::clone(&self.transport);
            let received = event.timestamp;
            tokio::spawn(async move {
                match tokio::task::spawn_blocking(move || dispatcher.dispatch(&event)).await {
                    Ok(Some(reply)) => {
                        let elapsed = chrono::Utc::now() - received;
                        debug!(
                            to = %reply.to,
                            ms = elapsed.num_milliseconds(),
                            "reply ready"
                        );
                        if let Err(e) = transport.send(&reply.to, &reply.body, reply.channel).await
                        {
                            warn!("failed to deliver reply to {}: {}", reply.to, e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => error!("dispatch task failed: {}", e),
                }
            });
        }
        info!("message stream closed, shutting down");
        Ok(())
    }
}
