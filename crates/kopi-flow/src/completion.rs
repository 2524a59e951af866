/// How a statement (or a whole `try` construct) finished.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion<V, E> {
    Normal,
    Return(V),
    Throw(E),
}

impl<V, E> Completion<V, E> {
    #[must_use]
    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal)
    }

    /// Outcome of a `try` construct once its `finally` block has run.
    ///
    /// A `finally` that completes normally lets the pending outcome through; an abrupt `finally`
    /// replaces it, discarding an in-flight return value or exception.
    #[must_use]
    pub fn then_finally(self, finally: Completion<V, E>) -> Completion<V, E> {
        match finally {
            Completion::Normal => self,
            abrupt => abrupt,
        }
    }
}
