use super::{Pipeline, PipelineError};
use crate::sql::{SqlCatalog, StagingSources, TargetTable};
use crate::tasks::{
    DataQualityCheck, DataQualityTask, LoadDimensionTask, LoadFactTask, StageTask,
};
use std::sync::Arc;

pub const DEFAULT_PIPELINE_ID: &str = "sparkify_etl";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub id: String,
    pub truncate_dimensions: bool,
    pub quality_checks: Vec<DataQualityCheck>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            id: DEFAULT_PIPELINE_ID.to_string(),
            truncate_dimensions: true,
            quality_checks: DataQualityCheck::null_key_checks(),
        }
    }
}

fn dimension_task_id(target: TargetTable) -> &'static str {
    match target {
        TargetTable::Users => "load_user_dim",
        TargetTable::Songs => "load_song_dim",
        TargetTable::Artists => "load_artist_dim",
        TargetTable::Time => "load_time_dim",
        TargetTable::Songplays => "load_songplays_fact",
    }
}

/// Stage both datasets, load the fact table, fan out to the dimensions and
/// finish with the quality checks.
pub fn build_sparkify_pipeline(
    catalog: &SqlCatalog,
    sources: &StagingSources,
    settings: &PipelineSettings,
) -> Result<Pipeline, PipelineError> {
    let mut pipeline = Pipeline::new(settings.id.clone());

    pipeline.add_task(
        Arc::new(StageTask::new("stage_events", sources.events_copy())),
        &[],
    )?;
    pipeline.add_task(
        Arc::new(StageTask::new("stage_songs", sources.songs_copy())),
        &[],
    )?;

    let fact_id = dimension_task_id(TargetTable::Songplays);
    pipeline.add_task(
        Arc::new(LoadFactTask::from_insert(
            fact_id,
            &catalog.insert_select(TargetTable::Songplays),
        )),
        &["stage_events", "stage_songs"],
    )?;

    let mut dimension_ids = Vec::new();
    for target in TargetTable::ALL.iter().filter(|t| !t.is_fact()) {
        let id = dimension_task_id(*target);
        pipeline.add_task(
            Arc::new(LoadDimensionTask::from_insert(
                id,
                &catalog.insert_select(*target),
                settings.truncate_dimensions,
            )),
            &[fact_id],
        )?;
        dimension_ids.push(id);
    }

    pipeline.add_task(
        Arc::new(DataQualityTask::new(
            "run_data_quality_checks",
            settings.quality_checks.clone(),
        )),
        &dimension_ids,
    )?;

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::Dialect;

    fn sources() -> StagingSources {
        StagingSources {
            log_data: "data/log_data".to_string(),
            log_jsonpath: None,
            song_data: "data/song_data".to_string(),
        }
    }

    #[test]
    fn test_sparkify_pipeline_order() {
        let pipeline = build_sparkify_pipeline(
            &SqlCatalog::new(Dialect::Sqlite),
            &sources(),
            &PipelineSettings::default(),
        )
        .unwrap();

        assert_eq!(pipeline.id(), "sparkify_etl");
        assert_eq!(
            pipeline.execution_order().unwrap(),
            vec![
                "stage_events",
                "stage_songs",
                "load_songplays_fact",
                "load_user_dim",
                "load_song_dim",
                "load_artist_dim",
                "load_time_dim",
                "run_data_quality_checks",
            ]
        );
    }

    #[test]
    fn test_default_settings_check_dimension_keys() {
        let settings = PipelineSettings::default();
        assert!(settings.truncate_dimensions);
        assert_eq!(settings.quality_checks.len(), 4);
    }
}
