use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::executor::CodeExecutor;
use crate::types::{ExecutionLimits, ExecutionRequest, Outcome};

/// Front door for concurrent executions.
///
/// Each request runs end-to-end in isolation; the semaphore caps how many
/// child processes exist at once. The only shared state is this cap and
/// the read-only limits.
#[derive(Clone)]
pub struct ExecutionService {
    executor: Arc<CodeExecutor>,
    semaphore: Arc<Semaphore>,
}

impl ExecutionService {
    pub fn new(max_concurrent: usize, limits: ExecutionLimits) -> Self {
        Self {
            executor: Arc::new(CodeExecutor::new(limits)),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub async fn execute(&self, request: ExecutionRequest) -> Result<Outcome, Error> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| Error::CapacityClosed)?;

        debug!(language = ?request.language, "starting execution");

        let result = self.executor.execute(&request).await;
        match &result {
            Ok(outcome) => info!(
                language = ?request.language,
                outcome = outcome.status_label(),
                "execution finished"
            ),
            Err(e) => error!(language = ?request.language, "execution failed: {}", e),
        }

        result
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::skip_if_not_available;
    use crate::types::StdinPayload;
    use crate::Language;
    use std::time::Duration;

    fn request(language: Language, code: &str) -> ExecutionRequest {
        ExecutionRequest {
            language,
            code: code.to_string(),
            input: None,
            timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    async fn concurrent_executions_do_not_interfere() -> Result<(), Error> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }

        let service = ExecutionService::new(4, ExecutionLimits::default());

        let mut handles = vec![];
        for n in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let outcome = service
                    .execute(request(Language::Python, &format!("print({} * 2)", n)))
                    .await?;
                Ok::<_, Error>((n, outcome))
            }));
        }

        for handle in handles {
            let (n, outcome) = handle.await.unwrap()?;
            match outcome {
                Outcome::Success { stdout, .. } => {
                    assert_eq!(stdout.trim(), (n * 2).to_string());
                }
                other => panic!("expected success, got {:?}", other),
            }
        }

        Ok(())
    }

    #[tokio::test]
    async fn permits_match_the_configured_cap() {
        let service = ExecutionService::new(2, ExecutionLimits::default());
        assert_eq!(service.available_slots(), 2);
    }

    #[tokio::test]
    async fn input_payload_reaches_the_program() -> Result<(), Error> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }

        let service = ExecutionService::new(1, ExecutionLimits::default());
        let mut req = request(Language::Python, "name = input()\nprint(f'Hello, {name}!')");
        req.input = Some(StdinPayload::Text("Test User".to_string()));

        match service.execute(req).await? {
            Outcome::Success { stdout, .. } => assert_eq!(stdout.trim(), "Hello, Test User!"),
            other => panic!("expected success, got {:?}", other),
        }
        Ok(())
    }
}
