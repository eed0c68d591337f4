use contagion::{
    error::Result,
    generator::GraphGenerator,
    infection::{infect_all, limited_infection, InfectionReport, DEFAULT_IMMUNE_GROUPS},
    renderer::Renderer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let generator = GraphGenerator::new();

    let graph = generator.generate()?;
    let mut renderer = Renderer::builder().build(&graph)?;
    summarize(&infect_all(&graph, &mut renderer)?);

    // Second run on a fresh graph
    let graph = generator.generate()?;
    let mut renderer = Renderer::builder().build(&graph)?;
    summarize(&limited_infection(
        &graph,
        DEFAULT_IMMUNE_GROUPS,
        &mut renderer,
    )?);

    Ok(())
}

fn summarize(report: &InfectionReport) {
    info!(
        kind = ?report.kind,
        steps = report.steps,
        infected = report.infected,
        total = report.total,
        rejected_seeds = report.rejected.len(),
        "run finished"
    );
}
