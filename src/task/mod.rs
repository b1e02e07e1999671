//! Fire-and-forget execution of the deferred answer pipeline.

use crate::{
    callback::{CallbackDispatcher, Delivery},
    config::TaskConfig,
    llm::InferenceGateway,
    prompt::select_prompt,
};
use std::sync::Arc;
use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

/// Binds one utterance to the callback URL its answer must reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundTask {
    pub utterance: String,
    pub callback_url: String,
}

#[derive(Clone)]
pub struct TaskRunner {
    gateway: Arc<InferenceGateway>,
    dispatcher: Arc<CallbackDispatcher>,
    limit: Option<Arc<Semaphore>>,
}

impl TaskRunner {
    pub fn new(
        gateway: Arc<InferenceGateway>,
        dispatcher: Arc<CallbackDispatcher>,
        config: &TaskConfig,
    ) -> Self {
        Self {
            gateway,
            dispatcher,
            limit: config
                .max_concurrent
                .map(|permits| permits.clamp(1, Semaphore::MAX_PERMITS))
                .map(|permits| Arc::new(Semaphore::new(permits))),
        }
    }

    pub fn gateway(&self) -> &Arc<InferenceGateway> {
        &self.gateway
    }

    /// Spawns the pipeline and returns immediately. Callers normally drop the handle.
    pub fn submit(&self, task: BackgroundTask) -> JoinHandle<()> {
        let gateway = self.gateway.clone();
        let dispatcher = self.dispatcher.clone();
        let limit = self.limit.clone();
        let span = info_span!("background_task", task_id = %Uuid::new_v4());

        tokio::spawn(
            async move {
                // Held until the pipeline finishes.
                let _permit = match limit {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            warn!("Task limiter closed, running unbounded: {}", e);
                            None
                        }
                    },
                    None => None,
                };

                run_pipeline(&gateway, &dispatcher, task).await;
            }
            .instrument(span),
        )
    }
}

/// Prompt selection, inference and callback delivery, strictly in that order.
pub async fn run_pipeline(
    gateway: &InferenceGateway,
    dispatcher: &CallbackDispatcher,
    task: BackgroundTask,
) -> Delivery {
    let prompt = select_prompt(&task.utterance);
    let answer = gateway.infer(&prompt).await;
    let delivery = dispatcher.deliver(&task.callback_url, &answer).await;

    if let Delivery::DeliveryFailed(ref detail) = delivery {
        warn!("Answer for {} was not delivered: {}", task.callback_url, detail);
    } else {
        debug!("Background task finished");
    }

    delivery
}
