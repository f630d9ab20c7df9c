//! aquabill-simulate - Bill a monthly volume against the progressive tariff.

fn main() -> std::process::ExitCode {
    aquabill::cmd::simulate::main()
}
