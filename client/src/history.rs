use crate::{ContentApi, Error, Record, Result};

/// A reversible content operation, captured with enough state to invert it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Create { record: Record },
    Delete { record: Record },
    Update { before: Record, after: Record },
}

/// Linear undo/redo history over content operations. Recording a new action
/// empties the redo stack; a failed undo or redo restores the action to the
/// stack it came from so the operator can retry.
#[derive(Debug, Default)]
pub struct ActionLog {
    undo: Vec<Action>,
    redo: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: Action) {
        self.undo.push(action);
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Reverses the most recent action. Returns `false` when there is nothing
    /// to undo.
    pub async fn undo(&mut self, api: &impl ContentApi) -> Result<bool> {
        let Some(action) = self.undo.pop() else {
            return Ok(false);
        };
        match invert(api, &action).await {
            Ok(()) => {
                self.redo.push(action);
                Ok(true)
            }
            Err(err) => {
                self.undo.push(action);
                Err(err)
            }
        }
    }

    /// Re-applies the most recently undone action. Returns `false` when there
    /// is nothing to redo.
    pub async fn redo(&mut self, api: &impl ContentApi) -> Result<bool> {
        let Some(action) = self.redo.pop() else {
            return Ok(false);
        };
        match apply(api, &action).await {
            Ok(()) => {
                self.undo.push(action);
                Ok(true)
            }
            Err(err) => {
                self.redo.push(action);
                Err(err)
            }
        }
    }
}

async fn invert(api: &impl ContentApi, action: &Action) -> Result<()> {
    match action {
        Action::Create { record } => api.delete(record.id().ok_or(Error::MissingId)?).await,
        Action::Delete { record } => api.create(record).await.map(drop),
        Action::Update { before, .. } => {
            let id = before.id().ok_or(Error::MissingId)?;
            api.update(id, before).await.map(drop)
        }
    }
}

async fn apply(api: &impl ContentApi, action: &Action) -> Result<()> {
    match action {
        Action::Create { record } => api.create(record).await.map(drop),
        Action::Delete { record } => api.delete(record.id().ok_or(Error::MissingId)?).await,
        Action::Update { after, .. } => {
            let id = after.id().ok_or(Error::MissingId)?;
            api.update(id, after).await.map(drop)
        }
    }
}
