//! Statistics tests.
//!
//! CPI bookkeeping and the stats-file line format.

use rvpipe_core::stats::SimStats;

#[test]
fn cpi_recomputes_per_cycle() {
    let mut stats = SimStats::default();
    stats.end_cycle();
    assert!(
        (stats.cycles_per_instruction - 0.0).abs() < f64::EPSILON,
        "CPI stays zero before the first retire"
    );

    stats.instructions_executed = 2;
    stats.end_cycle();
    assert!((stats.cycles_per_instruction - 1.0).abs() < 1e-9);

    stats.end_cycle();
    assert!((stats.cycles_per_instruction - 1.5).abs() < 1e-9);
}

#[test]
fn render_emits_every_counter_line() {
    let stats = SimStats {
        cycles: 8,
        instructions_executed: 4,
        data_transfer_instructions: 1,
        alu_instructions: 2,
        control_instructions: 1,
        stall_bubbles: 3,
        data_hazards: 2,
        control_hazards: 1,
        pipeline_flushes: 1,
        branch_mispredictions: 1,
        cycles_per_instruction: 2.0,
    };
    let rendered = stats.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "CyclesPerInstruction: 2.00");
    assert_eq!(lines[1], "TotalCycles: 8");
    assert_eq!(lines[2], "InstructionsExecuted: 4");
    assert_eq!(lines[3], "DataTransferInstructions: 1");
    assert_eq!(lines[4], "ALUInstructions: 2");
    assert_eq!(lines[5], "ControlInstructions: 1");
    assert_eq!(lines[6], "StallBubbles: 3");
    assert_eq!(lines[7], "DataHazards: 2");
    assert_eq!(lines[8], "ControlHazards: 1");
    assert_eq!(lines[9], "PipelineFlushes: 1");
    assert_eq!(lines[10], "BranchMispredictions: 1");
}

#[test]
fn write_to_file_round_trips() {
    let stats = SimStats {
        cycles: 5,
        instructions_executed: 1,
        ..SimStats::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.txt");
    stats.write_to_file(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), stats.render());
}
