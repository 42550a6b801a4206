use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::numbering::format::{assign_numbers, numbered_name, Assignment};
use crate::numbering::hierarchy::organize;
use crate::numbering::write::{field_update, rename_update, Strategy, Update};
use crate::providers::TaskSource;

const BANNER_RULE: &str = "============================================================";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub list_id: String,
    pub strategy: Strategy,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Previewed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ItemReport {
    pub task_id: String,
    pub number: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub dry_run: bool,
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.items.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated))
    }

    pub fn previewed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Previewed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn write_to(&self, out: &mut impl Write) -> Result<()> {
        if self.dry_run {
            writeln!(
                out,
                "Summary: {} to update, {} skipped, {} would fail",
                self.previewed(),
                self.skipped(),
                self.failed()
            )?;
        } else {
            writeln!(
                out,
                "Summary: {} updated, {} skipped, {} failed",
                self.updated(),
                self.skipped(),
                self.failed()
            )?;
        }

        for report in &self.items {
            let (mark, reason) = match &report.outcome {
                Outcome::Failed(reason) => ("✗", reason),
                Outcome::Skipped(reason) => ("⚠", reason),
                _ => continue,
            };
            let reason = reason.lines().next().unwrap_or_default();
            writeln!(out, "  {mark} {} ({}): {reason}", report.number, report.task_id)?;
        }

        writeln!(out, "\n{BANNER_RULE}")?;
        if self.dry_run {
            writeln!(out, "DRY RUN COMPLETE - No changes were made")?;
            writeln!(out, "Run without --dry-run flag to apply changes")?;
        } else {
            writeln!(out, "NUMBERING COMPLETE")?;
        }
        writeln!(out, "{BANNER_RULE}")?;
        Ok(())
    }
}

/// Fetch a list, number its epics and tasks, and report or apply every write.
///
/// Only the fetch and console output can fail the run. A failed write is narrated,
/// recorded in the summary, and the loop moves on to the next item.
pub async fn run<S, W>(source: &S, opts: &RunOptions, out: &mut W) -> Result<RunSummary>
where
    S: TaskSource + ?Sized,
    W: Write,
{
    writeln!(out, "Fetching tasks from list {}...", opts.list_id)?;
    let tasks = source
        .fetch_tasks(&opts.list_id, opts.strategy.needs_custom_fields())
        .await
        .with_context(|| format!("Failed to fetch tasks from list {}", opts.list_id))?;

    let mut summary = RunSummary {
        dry_run: opts.dry_run,
        items: Vec::new(),
    };

    if tasks.is_empty() {
        writeln!(out, "No tasks found in this list.")?;
        return Ok(summary);
    }

    info!(list_id = %opts.list_id, count = tasks.len(), source = source.name(), "fetched tasks");
    writeln!(out, "Found {} tasks. Organizing by hierarchy...", tasks.len())?;

    let groups = organize(&tasks);
    writeln!(out, "\nFound {} epics.\n", groups.len())?;

    for (i, assignment) in assign_numbers(&groups).iter().enumerate() {
        if assignment.number.is_epic() && i > 0 {
            writeln!(out)?;
        }
        let outcome = process_item(source, opts, assignment, out).await?;
        summary.items.push(ItemReport {
            task_id: assignment.item.id.clone(),
            number: assignment.number.to_string(),
            outcome,
        });
    }

    writeln!(out)?;
    summary.write_to(out)?;
    Ok(summary)
}

async fn process_item<S, W>(
    source: &S,
    opts: &RunOptions,
    assignment: &Assignment<'_>,
    out: &mut W,
) -> Result<Outcome>
where
    S: TaskSource + ?Sized,
    W: Write,
{
    let item = assignment.item;
    let number = assignment.number;
    let (label, kind, pad) = if number.is_epic() {
        ("Epic", "epic", "")
    } else {
        ("Task", "task", "  ")
    };

    let update = match &opts.strategy {
        Strategy::CustomField { field_name } => {
            let Some(field) = item.custom_field(field_name) else {
                warn!(task_id = %item.id, field = %field_name, "custom field missing, skipping");
                writeln!(
                    out,
                    "{pad}⚠ Warning: Custom field '{field_name}' not found on {kind} '{}'",
                    item.name
                )?;
                writeln!(out, "{pad}  Skipping {kind}")?;
                return Ok(Outcome::Skipped(format!(
                    "custom field '{field_name}' not found"
                )));
            };

            let current = field
                .display_value()
                .unwrap_or_else(|| "(empty)".to_string());
            writeln!(out, "{pad}{label} {number}: {}", item.name)?;
            writeln!(out, "{pad}  Current {field_name}: {current}")?;
            writeln!(out, "{pad}  New {field_name}: {number}")?;
            writeln!(out, "{pad}  Field type: {}", field.field_type)?;
            field_update(item, field, number)
        }
        Strategy::Name => {
            writeln!(out, "{pad}{label} {number}: {}", item.name)?;
            writeln!(out, "{pad}  Current name: {}", item.name)?;
            writeln!(out, "{pad}  New name: {}", numbered_name(number, &item.name))?;
            Ok(rename_update(item, number))
        }
    };

    let update: Update = match update {
        Ok(update) => update,
        Err(err) => {
            warn!(task_id = %item.id, error = %err, "refusing to write field");
            let prefix = if opts.dry_run { "⚠ Would fail" } else { "✗ Error" };
            writeln!(out, "{pad}  {prefix}: {err}")?;
            return Ok(Outcome::Failed(err.to_string()));
        }
    };

    if opts.dry_run {
        writeln!(out, "{pad}  (Dry run - no changes made)")?;
        return Ok(Outcome::Previewed);
    }

    match update.apply(source).await {
        Ok(()) => {
            writeln!(out, "{pad}  ✓ Updated")?;
            Ok(Outcome::Updated)
        }
        Err(err) => {
            warn!(task_id = %item.id, error = %format!("{err:#}"), "write failed");
            writeln!(out, "{pad}  ✗ Error: {err:#}")?;
            Ok(Outcome::Failed(format!("{err:#}")))
        }
    }
}
