//! Ordered fallback chains.
//!
//! A chain holds strategies in priority order. Resolving it runs each attempt
//! in turn; an attempt that errors or yields nothing is logged and skipped, and
//! the first value produced wins. When every attempt misses, the caller's
//! default is returned instead of an error.

use std::fmt::Display;
use std::future::Future;

/// One named strategy in a chain
#[derive(Debug, Clone)]
pub struct Step<S> {
    pub description: String,
    pub strategy: S,
}

/// Where a resolved value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Found {
        value: T,
        step: usize,
        description: String,
    },
    Default(T),
}

impl<T> Resolution<T> {
    pub fn into_value(self) -> T {
        match self {
            Resolution::Found { value, .. } | Resolution::Default(value) => value,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Resolution::Found { value, .. } | Resolution::Default(value) => value,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    /// Index of the step that produced the value
    pub fn step(&self) -> Option<usize> {
        match self {
            Resolution::Found { step, .. } => Some(*step),
            Resolution::Default(_) => None,
        }
    }
}

/// Strategies evaluated in priority order
#[derive(Debug, Clone)]
pub struct FallbackChain<S> {
    name: String,
    steps: Vec<Step<S>>,
}

impl<S> FallbackChain<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a strategy with the lowest priority so far
    pub fn then(mut self, description: impl Into<String>, strategy: S) -> Self {
        self.steps.push(Step {
            description: description.into(),
            strategy,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run attempts in order until one yields a value
    pub async fn resolve<'a, T, E, F, Fut>(&'a self, default: T, mut attempt: F) -> Resolution<T>
    where
        F: FnMut(&'a S) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
        E: Display,
    {
        for (index, step) in self.steps.iter().enumerate() {
            match attempt(&step.strategy).await {
                Ok(Some(value)) => {
                    tracing::debug!(
                        chain = %self.name,
                        step = %step.description,
                        "fallback step succeeded"
                    );
                    return Resolution::Found {
                        value,
                        step: index,
                        description: step.description.clone(),
                    };
                }
                Ok(None) => {
                    tracing::debug!(chain = %self.name, step = %step.description, "no value");
                }
                Err(e) => {
                    tracing::debug!(
                        chain = %self.name,
                        step = %step.description,
                        error = %e,
                        "fallback step failed"
                    );
                }
            }
        }

        tracing::debug!(chain = %self.name, "all fallback steps exhausted");
        Resolution::Default(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn chain() -> FallbackChain<&'static str> {
        FallbackChain::new("price")
            .then("primary", "missing")
            .then("broken", "error")
            .then("secondary", "₹10")
            .then("tertiary", "₹20")
    }

    async fn lookup(strategy: &str) -> Result<Option<String>, String> {
        match strategy {
            "missing" => Ok(None),
            "error" => Err("element not found".to_string()),
            value => Ok(Some(value.to_string())),
        }
    }

    #[tokio::test]
    async fn test_first_successful_step_wins() {
        let visited = RefCell::new(Vec::new());
        let chain = chain();

        let resolution = chain
            .resolve("N/A".to_string(), |strategy| {
                visited.borrow_mut().push(*strategy);
                lookup(strategy)
            })
            .await;

        assert_eq!(resolution.step(), Some(2));
        assert_eq!(resolution.value(), "₹10");
        // Lower priority steps never run
        assert_eq!(*visited.borrow(), vec!["missing", "error", "₹10"]);
    }

    #[tokio::test]
    async fn test_exhausted_chain_returns_default() {
        let chain = FallbackChain::new("title")
            .then("primary", "missing")
            .then("secondary", "error");

        let resolution = chain.resolve("N/A".to_string(), |s| lookup(s)).await;

        assert!(!resolution.is_found());
        assert_eq!(resolution.into_value(), "N/A");
    }

    #[tokio::test]
    async fn test_empty_chain_returns_default() {
        let chain: FallbackChain<&str> = FallbackChain::new("empty");
        assert!(chain.is_empty());

        let resolution = chain.resolve(0, |_| async { Ok::<_, String>(Some(1)) }).await;
        assert_eq!(resolution, Resolution::Default(0));
    }
}
