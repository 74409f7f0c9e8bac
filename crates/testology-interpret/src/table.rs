//! Declarative interpretation tables.
//!
//! The serializable half of an interpretation config: level texts, subscale
//! thresholds and cross-test combinations as plain data, compiled into rule
//! functions by [`InterpretationConfig::from_table`].
//!
//! Titles and bodies are Tera templates. Every template sees `test_id`,
//! `total_score`, `level` and `level_id`; subscale thresholds additionally
//! get `subscale` and `score`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use testology_core::models::chunk::{InterpretationChunk, Priority};
use testology_core::models::result::{ScoredResult, SubscaleScore};
use testology_scoring::config::Comparator;

use crate::config::{InterpretationConfig, RuleResult, require_subscale};
use crate::cross_test::{CrossTestRule, TestCondition};
use crate::error::{RuleError, TableError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkTemplate {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Emit `chunk` when the subscale's score satisfies the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscaleThreshold {
    pub subscale_id: String,
    pub comparator: Comparator,
    pub value: f64,
    pub chunk: ChunkTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTestSpec {
    pub id: String,
    pub conditions: Vec<TestCondition>,
    pub chunk: ChunkTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationTable {
    pub test_id: String,
    #[serde(default)]
    pub levels: BTreeMap<String, ChunkTemplate>,
    /// Evaluated in declared order.
    #[serde(default)]
    pub thresholds: Vec<SubscaleThreshold>,
    #[serde(default)]
    pub cross_test: Vec<CrossTestSpec>,
}

impl InterpretationTable {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let table: Self = serde_json::from_str(json)?;
        tracing::debug!(
            test_id = %table.test_id,
            levels = table.levels.len(),
            thresholds = table.thresholds.len(),
            cross_test = table.cross_test.len(),
            "parsed interpretation table"
        );
        Ok(table)
    }
}

impl InterpretationConfig {
    /// Compile a declarative table into rule functions.
    ///
    /// Every title and body is parsed up front, so a template syntax error
    /// fails here rather than on the first matching result.
    pub fn from_table(table: InterpretationTable) -> Result<Self, TableError> {
        check_ids(&table)?;

        let mut tera = Tera::default();
        let levels = table
            .levels
            .iter()
            .map(|(level_id, template)| {
                let chunk =
                    CompiledChunk::compile(&mut tera, &format!("level/{level_id}"), template)?;
                Ok((level_id.clone(), chunk))
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        let thresholds = table
            .thresholds
            .iter()
            .enumerate()
            .map(|(i, threshold)| {
                let chunk =
                    CompiledChunk::compile(&mut tera, &format!("threshold/{i}"), &threshold.chunk)?;
                Ok((threshold.clone(), chunk))
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        let cross_test = table
            .cross_test
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let chunk =
                    CompiledChunk::compile(&mut tera, &format!("cross_test/{i}"), &spec.chunk)?;
                Ok((spec.clone(), chunk))
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        let tera = Arc::new(tera);

        let test_id = table.test_id;
        let mut config = InterpretationConfig::new(test_id.clone());

        for (level_id, chunk) in levels {
            let tera = Arc::clone(&tera);
            let test_id = test_id.clone();
            config = config.level(level_id, move |result| {
                chunk.render(&tera, &test_id, &result_context(result))
            });
        }

        if !thresholds.is_empty() {
            let tera = Arc::clone(&tera);
            let test_id = test_id.clone();
            config = config.subscales(move |result| {
                let mut chunks = Vec::new();
                for (threshold, chunk) in &thresholds {
                    let subscale = require_subscale(result, &threshold.subscale_id)?;
                    if !threshold.comparator.holds(subscale.score, threshold.value) {
                        continue;
                    }
                    let context = subscale_context(result, subscale);
                    chunks.push(chunk.render(&tera, &test_id, &context)?);
                }
                Ok(chunks)
            });
        }

        for (spec, chunk) in cross_test {
            let tera = Arc::clone(&tera);
            config = config.cross_test(CrossTestRule::new(spec.id, spec.conditions, move |set| {
                let current = set.current();
                chunk.render(&tera, &current.test_id, &result_context(current))
            }));
        }

        Ok(config)
    }
}

/// A chunk template whose title and body are registered in a shared [`Tera`].
struct CompiledChunk {
    id: String,
    priority: Option<Priority>,
    title: Option<String>,
    body: String,
}

impl CompiledChunk {
    fn compile(tera: &mut Tera, name: &str, template: &ChunkTemplate) -> Result<Self, TableError> {
        let title = match &template.title {
            Some(title) => Some(add_template(tera, format!("{name}/title"), title)?),
            None => None,
        };
        let body = add_template(tera, format!("{name}/body"), &template.body)?;
        Ok(Self {
            id: template.id.clone(),
            priority: template.priority,
            title,
            body,
        })
    }

    fn render(
        &self,
        tera: &Tera,
        test_id: &str,
        context: &Context,
    ) -> RuleResult<InterpretationChunk> {
        let render = |name: &str| {
            tera.render(name, context).map_err(|e| RuleError::Template {
                template: name.to_string(),
                message: e.to_string(),
            })
        };
        Ok(InterpretationChunk {
            id: self.id.clone(),
            title: self.title.as_deref().map(render).transpose()?,
            body: render(&self.body)?,
            priority: self.priority,
            test_id: Some(test_id.to_string()),
        })
    }
}

fn add_template(tera: &mut Tera, name: String, content: &str) -> Result<String, TableError> {
    tera.add_raw_template(&name, content)
        .map_err(|e| TableError::TemplateParse {
            template: name.clone(),
            message: e.to_string(),
        })?;
    Ok(name)
}

fn check_ids(table: &InterpretationTable) -> Result<(), TableError> {
    let templates = table
        .levels
        .iter()
        .map(|(level, t)| (format!("level '{level}'"), t))
        .chain(
            table
                .thresholds
                .iter()
                .map(|th| (format!("threshold on '{}'", th.subscale_id), &th.chunk)),
        )
        .chain(
            table
                .cross_test
                .iter()
                .map(|spec| (format!("cross-test rule '{}'", spec.id), &spec.chunk)),
        );

    for (location, template) in templates {
        if template.id.trim().is_empty() {
            return Err(TableError::EmptyChunkId(location));
        }
    }
    Ok(())
}

fn result_context(result: &ScoredResult) -> Context {
    let mut context = Context::new();
    context.insert("test_id", &result.test_id);
    context.insert("total_score", &result.total_score.to_string());
    context.insert("level", &result.total_level_label);
    context.insert("level_id", &result.total_level_id);
    context
}

fn subscale_context(result: &ScoredResult, subscale: &SubscaleScore) -> Context {
    let mut context = result_context(result);
    context.insert("subscale", &subscale.label);
    context.insert("score", &subscale.score.to_string());
    context
}
