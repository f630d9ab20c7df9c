//! aquabill-analyze - Analyse a water bill against its reading cycle and history.

fn main() -> std::process::ExitCode {
    aquabill::cmd::analyze::main()
}
