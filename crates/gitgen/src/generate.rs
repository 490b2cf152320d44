use libgitgen_core::{load_request, normalize, GenError, GenerateRequest};
use libgitgen_git::{generate_repo, GenerateReport};
use tracing::debug;

use crate::cli::Cli;
use crate::output::report;

pub fn run(cli: &Cli) -> Result<(), GenError> {
    let request = match &cli.file {
        Some(path) => load_request(path)?,
        None => GenerateRequest::Commits {
            commits: cli.commits,
        },
    };

    if cli.dry_run {
        return dry_run(cli, request);
    }

    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    debug!(dir = %dir.display(), "generating repository");

    let generated = generate_repo(&dir, request)?;
    report(cli, &generated, |r| Ok(summary(r)))
}

fn dry_run(cli: &Cli, request: GenerateRequest) -> Result<(), GenError> {
    let commands = normalize(&request.into_conf())?;
    report(cli, &commands, |c| Ok(serde_json::to_string_pretty(c)?))
}

fn summary(report: &GenerateReport) -> String {
    let mut msg = format!(
        "Generated {} commits ({} commands) in {}",
        report.commits, report.commands, report.dir
    );
    if let Some(head) = &report.head {
        let short = &head[..head.len().min(8)];
        match &report.branch {
            Some(branch) => msg.push_str(&format!("\nHEAD: {} at {}", branch, short)),
            None => msg.push_str(&format!("\nHEAD: detached at {}", short)),
        }
    }
    msg
}
