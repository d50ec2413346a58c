//! `search` command: runs the global search headlessly.

use std::time::Instant;

use crate::cli::common::{CliContext, CliError, CliResult};
use crate::models::SearchResult;
use crate::services::SearchEngine;
use clap::Args;
use serde::Serialize;

/// Search leads, contacts, deals, accounts, meetings, tasks, and settings
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Text to search for
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// JSON response types
#[derive(Debug, Serialize)]
struct SearchGroup<'a> {
    header: String,
    results: Vec<&'a SearchResult>,
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    query: &'a str,
    count: usize,
    groups: Vec<SearchGroup<'a>>,
}

impl SearchArgs {
    /// Execute the search command
    pub fn execute(&self, context: &CliContext) -> CliResult<()> {
        let records = context.records()?;
        let mut engine = SearchEngine::new(context.search.clone());

        if !engine.meets_threshold(&self.query) {
            return Err(CliError::validation(format!(
                "Query must be at least {} characters",
                context.search.min_query_len
            )));
        }

        engine.set_query(self.query.clone(), Instant::now());
        engine.search_now(&records);

        let groups: Vec<SearchGroup<'_>> = engine
            .grouped()
            .into_iter()
            .map(|group| SearchGroup {
                header: group.header,
                results: group.entries.into_iter().map(|(_, result)| result).collect(),
            })
            .collect();
        let response = SearchResponse {
            query: &self.query,
            count: engine.results().len(),
            groups,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else if response.count == 0 {
            println!("No results for '{}'.", self.query);
        } else {
            for group in &response.groups {
                println!("{}:", group.header);
                for result in &group.results {
                    match &result.subtitle {
                        Some(subtitle) => {
                            println!("  {:<32} {:<28} {}", result.title, subtitle, result.target);
                        }
                        None => println!("  {:<32} {:<28} {}", result.title, "", result.target),
                    }
                }
                println!();
            }
        }

        Ok(())
    }
}
