use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::plan::PlanRequest;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Issue key to build the test plan for.
    pub ticket_id: String,
    /// Generation provider: hosted (groq) or local (ollama).
    #[arg(short, long)]
    pub provider: Option<String>,
    /// Model to run instead of the provider's default.
    #[arg(short, long)]
    pub model: Option<String>,
    /// Plain-text template file; the built-in template is used when omitted.
    #[arg(short, long)]
    pub template: Option<PathBuf>,
    /// Write the generated plan to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Emit content, provider and resolved model as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &AppContext, args: PlanArgs) -> AppResult<()> {
    let template_text = args.template.as_ref().map(fs::read_to_string).transpose()?;

    let request = PlanRequest {
        ticket_id: args.ticket_id,
        template_text,
        provider: args
            .provider
            .unwrap_or_else(|| ctx.config.default_provider.clone()),
        model_override: args.model,
    };

    let result = ctx.synthesizer().synthesize(request).await?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.content
    };

    match args.output {
        Some(path) => {
            fs::write(&path, rendered)?;
            info!(path = %path.display(), "test plan written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
