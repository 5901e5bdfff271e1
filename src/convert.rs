//! Batch conversion and deletion of components.
//!
//! Every item is attempted; failures (returned errors and panics alike) are
//! collected and reported together once the whole batch has finished.

use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{ConversionError, SvgsResult};
use crate::pool::{worker_pool, DEFAULT_CONCURRENCY};
use crate::storage::{ComponentMetadata, SvgDatabase};

/// Per-component work plugged into a [`Converter`].
pub trait ConvertHooks: Send + Sync {
    fn convert_one(&self, item: &ComponentMetadata) -> anyhow::Result<()>;

    fn delete_one(&self, item: &ComponentMetadata) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Convert,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Convert => "convert",
            Action::Delete => "delete",
        }
    }
}

/// Runs hooks over a batch and keeps the database in step with the
/// outcome: an item is upserted (or removed) only after its hook succeeded.
pub struct Converter<'a, H: ConvertHooks> {
    hooks: &'a H,
    database: &'a SvgDatabase,
    concurrency: usize,
}

impl<'a, H: ConvertHooks> Converter<'a, H> {
    pub fn new(hooks: &'a H, database: &'a SvgDatabase) -> Self {
        Self {
            hooks,
            database,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn run_convert(&self, items: &[ComponentMetadata]) -> SvgsResult<usize> {
        self.run(Action::Convert, items)
    }

    pub fn run_delete(&self, items: &[ComponentMetadata]) -> SvgsResult<usize> {
        self.run(Action::Delete, items)
    }

    fn run(&self, action: Action, items: &[ComponentMetadata]) -> SvgsResult<usize> {
        if items.is_empty() {
            tracing::info!("✨ No icons to {}.", action.verb());
            return Ok(0);
        }

        let pool = worker_pool(self.concurrency)?;
        let outcomes: Vec<Result<(), String>> = pool.install(|| {
            items
                .par_iter()
                .map(|item| self.attempt(action, item))
                .collect()
        });

        let failures: Vec<String> = items
            .iter()
            .zip(outcomes)
            .filter_map(|(item, outcome)| {
                outcome.err().map(|message| {
                    format!("Failed to {} {}: {}", action.verb(), item.component_name, message)
                })
            })
            .collect();

        let succeeded = items.len() - failures.len();
        if !failures.is_empty() {
            for failure in &failures {
                tracing::error!("{}", failure);
            }
            return Err(ConversionError { failures }.into());
        }

        tracing::info!("✓ {} {} icon(s)", past_tense(action), succeeded);
        Ok(succeeded)
    }

    fn attempt(&self, action: Action, item: &ComponentMetadata) -> Result<(), String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> anyhow::Result<()> {
            match action {
                Action::Convert => {
                    self.hooks.convert_one(item)?;
                    self.database.upsert(item.clone())?;
                }
                Action::Delete => {
                    self.hooks.delete_one(item)?;
                    self.database.delete(&item.icon_name)?;
                }
            }
            Ok(())
        }));

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("{:#}", e)),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

fn past_tense(action: Action) -> &'static str {
    match action {
        Action::Convert => "Converted",
        Action::Delete => "Deleted",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SvgsError;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct ScriptedHooks {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedHooks {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ConvertHooks for ScriptedHooks {
        fn convert_one(&self, item: &ComponentMetadata) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(item.icon_name.clone());
            match item.icon_name.as_str() {
                "bad" => anyhow::bail!("transform exploded"),
                "panics" => panic!("hook panicked"),
                _ => Ok(()),
            }
        }

        fn delete_one(&self, item: &ComponentMetadata) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("-{}", item.icon_name));
            Ok(())
        }
    }

    fn meta(name: &str, component: &str) -> ComponentMetadata {
        ComponentMetadata {
            icon_name: name.to_string(),
            path: PathBuf::from(format!("{name}.svg")),
            hash: format!("hash-{name}"),
            component_name: component.to_string(),
            family: None,
        }
    }

    fn database(temp_dir: &TempDir) -> SvgDatabase {
        let db = SvgDatabase::new(temp_dir.path().join("db.json"));
        db.load().unwrap();
        db
    }

    #[test]
    fn test_partial_failure_attempts_everything() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&temp_dir);
        let hooks = ScriptedHooks::new();
        let items = vec![meta("a", "A"), meta("bad", "Bad"), meta("c", "C")];

        let result = Converter::new(&hooks, &db).run_convert(&items);

        match result {
            Err(SvgsError::Conversion(error)) => {
                assert_eq!(error.failures, vec!["Failed to convert Bad: transform exploded"]);
                assert!(error
                    .to_string()
                    .starts_with("Conversion failed due to errors.\n  - Failed to convert Bad"));
            }
            other => panic!("expected conversion error, got {:?}", other),
        }

        assert_eq!(hooks.calls.lock().unwrap().len(), 3);
        assert!(db.get("a").unwrap().is_some());
        assert!(db.get("bad").unwrap().is_none());
        assert!(db.get("c").unwrap().is_some());
    }

    #[test]
    fn test_panic_is_reported_as_failure() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&temp_dir);
        let hooks = ScriptedHooks::new();

        let result = Converter::new(&hooks, &db)
            .with_concurrency(1)
            .run_convert(&[meta("panics", "Panics"), meta("ok", "Ok")]);

        match result {
            Err(SvgsError::Conversion(error)) => {
                assert_eq!(error.failures, vec!["Failed to convert Panics: hook panicked"]);
            }
            other => panic!("expected conversion error, got {:?}", other),
        }
        assert!(db.get("ok").unwrap().is_some());
    }

    #[test]
    fn test_delete_removes_from_database() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&temp_dir);
        db.upsert(meta("gone", "Gone")).unwrap();
        let hooks = ScriptedHooks::new();

        let deleted = Converter::new(&hooks, &db).run_delete(&[meta("gone", "Gone")]).unwrap();

        assert_eq!(deleted, 1);
        assert!(db.get("gone").unwrap().is_none());
        assert_eq!(*hooks.calls.lock().unwrap(), vec!["-gone".to_string()]);
    }

    #[test]
    fn test_empty_batches_are_noops() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&temp_dir);
        let hooks = ScriptedHooks::new();
        let converter = Converter::new(&hooks, &db);

        assert_eq!(converter.run_convert(&[]).unwrap(), 0);
        assert_eq!(converter.run_delete(&[]).unwrap(), 0);
        assert!(hooks.calls.lock().unwrap().is_empty());
    }
}
