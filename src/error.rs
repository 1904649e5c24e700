// Pipeline error taxonomy.
// Field-level problems (unparsable dates, unknown codes) never become
// errors: the validators and standardizers degrade them to null/defaults.
// Only relation-level problems surface here, and they abort the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A relation the stage depends on does not exist.
    #[error("relation '{relation}' is missing")]
    SchemaMissing { relation: String },

    /// Underlying SQLite failure, surfaced verbatim.
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),

    /// An entity load or gold build failed; the run aborts with the first
    /// failure's detail preserved. Completed entity loads stay committed.
    #[error("load of '{entity}' failed: {source}")]
    EntityLoad {
        entity: &'static str,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    pub fn schema_missing(relation: &str) -> Self {
        PipelineError::SchemaMissing {
            relation: relation.to_string(),
        }
    }

    pub fn entity(entity: &'static str, source: PipelineError) -> Self {
        PipelineError::EntityLoad {
            entity,
            source: Box::new(source),
        }
    }
}
