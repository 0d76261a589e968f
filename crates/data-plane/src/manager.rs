use async_trait::async_trait;
use dsc_common::{retry_async, RetrySettings};
use dsc_error::{ConnectorError, ErrorCode, Result};
use dsc_spi::dataplane::{DataOperatorRegistry, DataPlaneManager};
use dsc_spi::types::{DataFlowRequest, DataFlowState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub const QUEUE_CAPACITY_SETTING: &str = "edc.dataplane.queue.capacity";
pub const WORKERS_SETTING: &str = "edc.dataplane.workers";
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;
pub const DEFAULT_WORKERS: usize = 1;

type States = Arc<RwLock<HashMap<String, DataFlowState>>>;
type Queue = Arc<tokio::sync::Mutex<mpsc::Receiver<DataFlowRequest>>>;

/// Queues data flows and runs them on a fixed number of worker tasks.
pub struct DataPlaneManagerImpl {
    registry: Arc<dyn DataOperatorRegistry>,
    retry: RetrySettings,
    workers: usize,
    queue_tx: mpsc::Sender<DataFlowRequest>,
    queue_rx: Mutex<Option<mpsc::Receiver<DataFlowRequest>>>,
    states: States,
}

impl DataPlaneManagerImpl {
    pub fn new(
        registry: Arc<dyn DataOperatorRegistry>,
        retry: RetrySettings,
        queue_capacity: usize,
        workers: usize,
    ) -> Self {
        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity.max(1));
        Self {
            registry,
            retry,
            workers: workers.max(1),
            queue_tx,
            queue_rx: Mutex::new(Some(queue_rx)),
            states: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Spawns the workers. Returns `None` if they were already started.
    pub fn start(&self) -> Option<DataPlaneWorkers> {
        let queue_rx = self
            .queue_rx
            .lock()
            .expect("data flow queue lock poisoned")
            .take()?;
        let queue: Queue = Arc::new(tokio::sync::Mutex::new(queue_rx));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let tasks = (0..self.workers)
            .map(|worker| {
                let flow = DataFlow {
                    registry: self.registry.clone(),
                    retry: self.retry,
                    states: self.states.clone(),
                };
                tokio::spawn(run_worker(worker, queue.clone(), shutdown_rx.clone(), flow))
            })
            .collect();

        info!(workers = self.workers, "Data plane workers started");
        Some(DataPlaneWorkers { shutdown_tx, tasks })
    }

    /// Undoes the `Received` entry of a flow that never reached the queue.
    fn restore_state(&self, process_id: &str, previous: Option<DataFlowState>) {
        let mut states = self.states.write().expect("data flow states lock poisoned");
        match previous {
            Some(state) => states.insert(process_id.to_string(), state),
            None => states.remove(process_id),
        };
    }
}

#[async_trait]
impl DataPlaneManager for DataPlaneManagerImpl {
    fn validate(&self, request: &DataFlowRequest) -> Result<()> {
        if self.registry.get_stream_publisher(request).is_some() {
            return Ok(());
        }

        let mut errors = Vec::new();
        let source_type = request.source_data_address.address_type();
        if self.registry.get_reader(source_type).is_none() {
            errors.push(format!("No reader registered for source type: {}", source_type));
        }
        let destination_type = request.destination_data_address.address_type();
        if self.registry.get_writer(destination_type).is_none() {
            errors.push(format!(
                "No writer registered for destination type: {}",
                destination_type
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConnectorError::invalid_request(errors))
        }
    }

    async fn initiate_transfer(&self, request: DataFlowRequest) -> Result<()> {
        let process_id = request.process_id.clone();
        // Received must be recorded before a worker can see the flow.
        let previous = self
            .states
            .write()
            .expect("data flow states lock poisoned")
            .insert(process_id.clone(), DataFlowState::Received);

        if let Err(e) = self.queue_tx.try_send(request) {
            self.restore_state(&process_id, previous);
            return Err(match e {
                mpsc::error::TrySendError::Full(_) => {
                    ConnectorError::new(ErrorCode::QueueFull, "Data flow queue is full")
                        .with_trace_id(process_id.as_str())
                }
                mpsc::error::TrySendError::Closed(_) => {
                    ConnectorError::internal("Data flow queue is closed")
                }
            });
        }
        debug!(process_id = %process_id, "Data flow queued");
        Ok(())
    }

    fn transfer_state(&self, process_id: &str) -> DataFlowState {
        self.states
            .read()
            .expect("data flow states lock poisoned")
            .get(process_id)
            .copied()
            .unwrap_or(DataFlowState::NotTracked)
    }
}

fn set_state(states: &States, process_id: &str, state: DataFlowState) {
    states
        .write()
        .expect("data flow states lock poisoned")
        .insert(process_id.to_string(), state);
}

/// Everything a worker needs to execute one flow.
struct DataFlow {
    registry: Arc<dyn DataOperatorRegistry>,
    retry: RetrySettings,
    states: States,
}

impl DataFlow {
    async fn execute(&self, request: DataFlowRequest) {
        let process_id = request.process_id.clone();
        set_state(&self.states, &process_id, DataFlowState::InProgress);

        let result = match self.registry.get_stream_publisher(&request) {
            Some(publisher) => publisher.notify_publisher(&request).await,
            None => self.copy(&request).await,
        };

        match result {
            Ok(()) => {
                set_state(&self.states, &process_id, DataFlowState::Completed);
                info!(process_id = %process_id, "Data flow completed");
            }
            Err(e) => {
                set_state(&self.states, &process_id, DataFlowState::Failed);
                error!(target: "errors", process_id = %process_id, error = %e, "Data flow failed");
            }
        }
    }

    async fn copy(&self, request: &DataFlowRequest) -> Result<()> {
        let source = &request.source_data_address;
        let destination = &request.destination_data_address;
        let reader = self.registry.get_reader(source.address_type()).ok_or_else(|| {
            ConnectorError::new(
                ErrorCode::UnsupportedDataType,
                format!("No reader registered for source type: {}", source.address_type()),
            )
        })?;
        let writer = self
            .registry
            .get_writer(destination.address_type())
            .ok_or_else(|| {
                ConnectorError::new(
                    ErrorCode::UnsupportedDataType,
                    format!(
                        "No writer registered for destination type: {}",
                        destination.address_type()
                    ),
                )
            })?;
        let name = destination
            .key_name()
            .or_else(|| source.key_name())
            .unwrap_or(request.process_id.as_str());

        let operation = format!("data flow {}", request.process_id);
        retry_async(&operation, self.retry, || {
            let reader = reader.clone();
            let writer = writer.clone();
            async move {
                let data = reader.read(source).await?;
                writer.write(destination, name, data).await
            }
        })
        .await
    }
}

async fn run_worker(
    worker: usize,
    queue: Queue,
    mut shutdown_rx: watch::Receiver<bool>,
    flow: DataFlow,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown_rx.changed() => {
                debug!(worker, "Data plane worker stopped");
                return;
            }
            next = async { queue.lock().await.recv().await } => next,
        };
        let Some(request) = next else { return };
        flow.execute(request).await;
    }
}

/// Handle to the worker tasks.
#[derive(Debug)]
pub struct DataPlaneWorkers {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl DataPlaneWorkers {
    /// Lets running flows finish, then stops every worker.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        let results = futures::future::join_all(std::mem::take(&mut self.tasks)).await;
        for e in results.into_iter().filter_map(|r| r.err()) {
            error!(error = %e, "Data plane worker failed during shutdown");
        }
    }
}

impl Drop for DataPlaneWorkers {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
