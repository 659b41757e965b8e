//! kardex-report - Reconstruct and export kardex reports.

fn main() -> std::process::ExitCode {
    kardex::cmd::report_cmd::main()
}
