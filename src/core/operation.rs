use crate::domain::model::OperationState;
use crate::utils::error::{LocationError, Result};

/// Tracks the lifecycle of one asynchronous operation. Every request owns
/// exactly one and resolves exactly once; any backwards or repeated
/// transition is an error.
#[derive(Debug)]
pub struct Lifecycle {
    state: OperationState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: OperationState::Pending,
        }
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == OperationState::Finished
    }

    pub fn start(&mut self) -> Result<()> {
        match self.state {
            OperationState::Pending => {
                self.state = OperationState::Running;
                Ok(())
            }
            from => Err(LocationError::InvalidTransition { from }),
        }
    }

    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            OperationState::Running => {
                self.state = OperationState::Finished;
                Ok(())
            }
            from => Err(LocationError::InvalidTransition { from }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_lifecycle_runs_forward() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), OperationState::Pending);
        lifecycle.start().unwrap();
        assert_eq!(lifecycle.state(), OperationState::Running);
        lifecycle.finish().unwrap();
        assert!(lifecycle.is_finished());
    }

    #[test]
    fn finish_before_start_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        assert!(matches!(
            lifecycle.finish(),
            Err(LocationError::InvalidTransition {
                from: OperationState::Pending
            })
        ));
    }

    #[test]
    fn no_reentry_after_finish() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.start().unwrap();
        lifecycle.finish().unwrap();
        assert!(lifecycle.start().is_err());
        assert!(lifecycle.finish().is_err());
    }

    #[test]
    fn double_start_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.start().unwrap();
        assert!(matches!(
            lifecycle.start(),
            Err(LocationError::InvalidTransition {
                from: OperationState::Running
            })
        ));
    }
}
