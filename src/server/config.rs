use super::RequestsLoggingLevel;

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub port: u16,
    pub requests_logging_level: RequestsLoggingLevel,
    /// Frontend directory served statically at the root, if any.
    pub frontend_dir_path: Option<String>,
    /// Probability of the simulated pre-start fault on fix operations.
    /// 0.0 on a real deployment; non-zero only to exercise the error
    /// paths of a dashboard pointed at this server.
    pub fix_fault_probability: f64,
}
