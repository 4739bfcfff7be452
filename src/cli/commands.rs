//! CLI command execution.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::cli::args::{Command, FerretArgs, SearchArgs};
use crate::config::SearchConfig;
use crate::content::item::{
    ArticleRecord, CategoryRecord, FieldDefinition, FieldValue, PageRecord, SourceType, TagRecord,
};
use crate::content::repository::MemoryRepository;
use crate::context::RequestContext;
use crate::error::{FerretError, Result};
use crate::search::engine::SearchEngine;
use crate::search::types::SearchOptions;
use crate::server::run_server;
use crate::suggest::analytics::{AnalyticsStore, MemoryAnalyticsStore, Timeframe};

/// Content loaded into the in-memory repository at startup.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedData {
    articles: Vec<ArticleRecord>,
    pages: Vec<PageRecord>,
    fields: Vec<FieldDefinition>,
    field_values: Vec<FieldValue>,
    categories: Vec<CategoryRecord>,
    tags: Vec<TagRecord>,
}

/// Execute the parsed CLI command.
pub fn execute_command(args: FerretArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let repository = load_repository(args.content.as_deref())?;
    let analytics: Arc<dyn AnalyticsStore> = Arc::new(MemoryAnalyticsStore::new());
    let engine = Arc::new(SearchEngine::with_analytics(
        repository,
        Some(analytics),
        config,
    )?);

    match args.command {
        Command::Serve(serve) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime
                .block_on(run_server(engine, &serve.bind))
                .map_err(FerretError::Anyhow)
        }
        Command::Search(search) => {
            let response = engine.search(
                &search.query,
                &search_options(&search),
                &RequestContext::anonymous(),
            );
            print_json(&response)
        }
        Command::Suggest(suggest) => {
            let suggestions =
                engine.suggest(&suggest.partial, suggest.limit, &RequestContext::anonymous())?;
            print_json(&suggestions)
        }
        Command::Trending(trending) => {
            let entries =
                engine.trending(trending.limit, Timeframe::parse(&trending.timeframe))?;
            print_json(&entries)
        }
        Command::Stats => print_json(&engine.stats()?),
    }
}

fn search_options(args: &SearchArgs) -> SearchOptions {
    let categories = args
        .category
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect();

    SearchOptions {
        limit: args.limit,
        offset: args.offset,
        categories,
        source_types: args
            .source_type
            .as_deref()
            .and_then(SourceType::parse)
            .into_iter()
            .collect(),
        debug: args.debug,
    }
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)
                .map_err(|e| FerretError::config(format!("invalid config file: {e}")))
        }
        None => Ok(SearchConfig::default()),
    }
}

fn load_repository(path: Option<&Path>) -> Result<Arc<MemoryRepository>> {
    let repository = Arc::new(MemoryRepository::new());

    if let Some(path) = path {
        let raw = fs::read_to_string(path)?;
        let seed: SeedData = serde_json::from_str(&raw)
            .map_err(|e| FerretError::config(format!("invalid content file: {e}")))?;

        for article in seed.articles {
            repository.add_article(article);
        }
        for page in seed.pages {
            repository.add_page(page);
        }
        for field in seed.fields {
            repository.add_field(field);
        }
        for value in seed.field_values {
            repository.add_field_value(value);
        }
        for category in seed.categories {
            repository.add_category(category);
        }
        for tag in seed.tags {
            repository.add_tag(tag);
        }
    }

    Ok(repository)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_data_parses_partial_files() {
        let seed: SeedData = serde_json::from_str(r#"{"articles": []}"#).unwrap();
        assert!(seed.articles.is_empty());
        assert!(seed.pages.is_empty());
    }

    #[test]
    fn test_default_config_when_no_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.default_limit, 10);
    }

    #[test]
    fn test_search_options_from_args() {
        let args = SearchArgs {
            query: "q".to_string(),
            limit: Some(5),
            offset: 10,
            source_type: Some("sp".to_string()),
            category: Some("3,4".to_string()),
            debug: true,
        };

        let options = search_options(&args);
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.offset, 10);
        assert_eq!(options.categories, vec![3, 4]);
        assert_eq!(options.source_types, vec![SourceType::PageBuilder]);
        assert!(options.debug);
    }
}
