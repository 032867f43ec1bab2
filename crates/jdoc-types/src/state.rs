/// Slot that holds the first error raised while a reader or converter runs
/// without an early return.
///
/// Callers that drive several steps and want to keep going after a
/// failure (to reach a consistent stopping point before reporting) record
/// into an `ErrorState` and check it at the end. Only the first error is
/// kept; later ones are dropped.
#[derive(Debug)]
pub struct ErrorState<E> {
    error: Option<E>,
}

impl<E> Default for ErrorState<E> {
    fn default() -> Self {
        Self { error: None }
    }
}

impl<E> ErrorState<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.error.is_some()
    }

    pub fn get(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// Record `error` unless one is already recorded.
    pub fn set(&mut self, error: impl Into<E>) {
        if self.error.is_none() {
            self.error = Some(error.into());
        }
    }

    /// Unwrap a result, recording its error.
    pub fn record<T, F: Into<E>>(&mut self, result: Result<T, F>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.set(e);
                None
            }
        }
    }

    pub fn take(&mut self) -> Option<E> {
        self.error.take()
    }

    /// `Err` with the recorded error, or `Ok(value)` if none was recorded.
    ///
    /// # Errors
    ///
    /// The recorded error.
    pub fn into_result<T>(self, value: T) -> Result<T, E> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_error() {
        let mut state = ErrorState::<String>::new();
        assert!(!state.is_set());
        assert_eq!(state.record::<u8, _>(Err("first")), None);
        state.set("second");
        assert_eq!(state.get().map(String::as_str), Some("first"));
        assert_eq!(state.into_result(()), Err("first".to_owned()));
    }

    #[test]
    fn ok_passes_through() {
        let mut state = ErrorState::<String>::new();
        assert_eq!(state.record::<_, String>(Ok(3)), Some(3));
        assert_eq!(state.into_result(4), Ok(4));
    }
}
