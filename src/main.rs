/*!
 * Process Scheduler - Main Entry Point
 *
 * scheduler <policy> [quantum_ms] <input_file>
 */

use miette::Result;
use proc_scheduler::config::USAGE;
use proc_scheduler::monitoring::PhaseSpan;
use proc_scheduler::{
    init_tracing, read_workload, Clock, Config, OsController, PolicyEngine, Report,
    SchedulerError, Workload,
};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            println!("{}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    info!(
        policy = config.policy.as_str(),
        quantum_ms = config.quantum.map(|q| q.as_millis()),
        input = %config.input.display(),
        "Scheduler starting"
    );

    // Scheduler start is sampled here, before any record is created
    let mut engine = PolicyEngine::new(OsController::new());

    let records = {
        let phase = PhaseSpan::new("load");
        let _entered = phase.enter();
        read_workload(&config.input, config.policy, engine.controller())
            .map_err(SchedulerError::from)?
    };
    let workload = Workload::build(records, config.policy);

    let schedule = {
        let phase = PhaseSpan::new("schedule");
        let _entered = phase.enter();
        engine
            .run(workload, config.policy, config.quantum)
            .map_err(SchedulerError::from)?
    };
    println!();

    let scheduler_time = engine
        .controller()
        .now()
        .saturating_sub(engine.context().started_at());
    let report = Report::new(&schedule, &config.input, scheduler_time);
    print!("{}", report);

    report
        .write_to(&config.report_path)
        .map_err(SchedulerError::from)?;
    if config.json_report {
        let json_path = report
            .write_json_beside(&config.report_path)
            .map_err(SchedulerError::from)?;
        info!(path = %json_path.display(), "JSON report written");
    }
    info!(path = %config.report_path.display(), "Report written");

    println!("Scheduler exits");
    Ok(())
}
