//! Analyze command implementation

use crate::analysis::{AnalysisRequest, ResultCache, TextAnalysisService};
use crate::cli::output::{format_analysis_json, format_analysis_table};
use crate::cli::AnalyzeArgs;
use crate::config::NordicConfig;
use crate::provider::create_provider;
use std::sync::Arc;

/// Build the analysis request from CLI arguments.
pub fn build_request(args: &AnalyzeArgs) -> Result<AnalysisRequest, Box<dyn std::error::Error>> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?.trim_end().to_string(),
        (None, None) => return Err("Provide a TEXT argument or --file".into()),
    };

    let mut request = AnalysisRequest::new(text).with_anonymize(args.anonymize);
    request.language = args.language;
    request.summary_length = args.summary_length;
    Ok(request)
}

/// Handle `nordicsense analyze`: one full analysis, printed as a table or JSON.
pub async fn handle_analyze(args: &AnalyzeArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        NordicConfig::load(Some(&args.config))?
    } else {
        NordicConfig::default()
    }
    .with_env_overrides();
    config.validate()?;

    let request = build_request(args)?;
    let issues = request.validate(config.analysis.max_text_length);
    if let Some(issue) = issues.first() {
        return Err(issue.message.clone().into());
    }

    let provider = create_provider(&config.provider, reqwest::Client::new())?;
    let cache = Arc::new(ResultCache::from_config(&config.cache));
    let service = TextAnalysisService::new(provider, cache, config.analysis.clone());

    let result = service.analyze_full(&request).await?;

    if args.json {
        Ok(format_analysis_json(&result)?)
    } else {
        Ok(format_analysis_table(&result))
    }
}
