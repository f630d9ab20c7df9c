//! aquabill-community - Compare charged and calculated bills across a neighbourhood.

fn main() -> std::process::ExitCode {
    aquabill::cmd::community::main()
}
