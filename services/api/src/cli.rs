use crate::page::{AssessmentPage, RequestEcho};
use crate::render::{render_assessment, render_notice};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fair_report::assessment::{
    build_report, AssessmentClient, AssessmentRequest, AssessmentResponse, ReportError,
    TransportError,
};
use fair_report::config::AppConfig;
use fair_report::error::AppError;
use fair_report::telemetry;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "FAIR Report",
    about = "Submit research objects for FAIR assessment and browse the evaluation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Assess one object identifier and print the report
    Assess(AssessArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Object identifier (PID or URL) to assess
    #[arg(long, required_unless_present = "from_file")]
    pub(crate) pid: Option<String>,
    /// Optional metadata service endpoint
    #[arg(long, default_value = "")]
    pub(crate) service_url: String,
    /// Metadata service type: oai_pmh, ogc_csw or sparql
    #[arg(long, default_value = "oai_pmh")]
    pub(crate) service_type: String,
    /// Metric version: metrics_v0.7_software or metrics_v0.7_software_cessda
    #[arg(long, default_value = "metrics_v0.7_software")]
    pub(crate) metric_version: String,
    /// Ask the service to consult DataCite
    #[arg(long)]
    pub(crate) use_datacite: bool,
    /// Replay a stored evaluation payload instead of calling the service
    #[arg(long)]
    pub(crate) from_file: Option<PathBuf>,
    /// Print the page model as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assessment(args).await,
    }
}

async fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let request = match &args.pid {
        Some(pid) => Some(AssessmentRequest::new(
            pid,
            &args.service_url,
            &args.service_type,
            &args.metric_version,
            args.use_datacite,
            config.assessment.use_github,
        )?),
        None => None,
    };

    let response = match (&args.from_file, &request) {
        (Some(path), _) => load_payload(path).await?,
        (None, Some(request)) => {
            let client = AssessmentClient::new(config.assessment.clone())?;
            client.send(request).await.map_err(|err| {
                eprintln!("{}", render_notice(&err.notice()));
                AppError::from(err)
            })?
        }
        (None, None) => return Err(AppError::from(TransportError::EmptyIdentifier)),
    };

    let report = build_report(response).map_err(|err| {
        if let Some(notice) = err.notice() {
            eprintln!("{}", render_notice(&notice));
        }
        AppError::from(err)
    })?;

    let page = AssessmentPage {
        request: request.as_ref().map(RequestEcho::from_request),
        report,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render_assessment(&page));
    }
    Ok(())
}

async fn load_payload(path: &Path) -> Result<AssessmentResponse, AppError> {
    let bytes = tokio::fs::read(path).await?;
    AssessmentResponse::from_slice(&bytes).ok_or_else(|| {
        AppError::from(ReportError::MalformedPayload {
            reason: format!("{} does not hold a JSON object", path.display()),
        })
    })
}
