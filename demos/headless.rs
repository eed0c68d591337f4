use contagion::{
    error::Result,
    generator::{GraphGenerator, InfectionGraph},
    infection::{Grouping, InfectedSet, InfectionKind, Propagation},
};

fn main() {
    // Build a reproducible graph
    let graph = GraphGenerator::new()
        .node_count(500)
        .edge_probability(0.01)
        .seed(42)
        .generate()
        .unwrap();

    // Count steps without writing any images
    let mut steps = 0;
    let mut sink = |_: &InfectionGraph,
                    infected: &InfectedSet,
                    _: InfectionKind,
                    step: usize|
     -> Result<()> {
        steps = step + 1;
        println!("step {step}: {} infected", infected.len());
        Ok(())
    };

    let mut infected = InfectedSet::from_roots(&graph);
    let report = Propagation::new(InfectionKind::limited())
        .grouping(Grouping::ByDistance)
        .run(&graph, &mut infected, &mut sink)
        .unwrap();

    println!(
        "{steps} steps, {} of {} infected, {} seeds rejected",
        report.infected,
        report.total,
        report.rejected.len()
    );
}
