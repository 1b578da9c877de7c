//! Test runner and statistics

use crate::error::TestResult;
use crate::vm_test::{VmTestResults, VmTestRunner};
use handel_evm::ProtocolSpec;
use std::path::Path;
use std::time::{Duration, Instant};

/// Aggregated test statistics
#[derive(Debug, Default)]
pub struct TestStats {
    /// Total tests executed
    pub total: usize,
    /// Tests passed
    pub passed: usize,
    /// Tests failed
    pub failed: usize,
    /// Tests skipped
    pub skipped: usize,
    /// Total execution time
    pub duration: Duration,
    /// Failed test names with reasons
    pub failures: Vec<(String, String)>,
}

impl TestStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the results of one file
    pub fn add_vm_results(&mut self, results: &VmTestResults) {
        self.total += results.total();
        self.passed += results.passed.len();
        self.failed += results.failed.len();
        self.skipped += results.skipped.len();
        for (name, reason) in &results.failed {
            self.failures.push((format!("{}::{}", results.file, name), reason.clone()));
        }
    }

    /// Record a file that could not be loaded
    pub fn add_file_error(&mut self, file: &Path, reason: String) {
        self.total += 1;
        self.failed += 1;
        self.failures.push((file.display().to_string(), reason));
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            return 100.0;
        }
        (self.passed as f64 / executed as f64) * 100.0
    }

    /// Print summary
    pub fn print_summary(&self) {
        println!("\n========================================");
        println!("Test Summary");
        println!("========================================");
        println!("Total:   {}", self.total);
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Skipped: {}", self.skipped);
        println!("Pass Rate: {:.2}%", self.pass_rate());
        println!("Duration: {:.2}s", self.duration.as_secs_f64());

        if !self.failures.is_empty() {
            println!("\nFailed tests:");
            for (name, reason) in &self.failures {
                println!("  - {}: {}", name, reason);
            }
        }
    }
}

/// Runs every fixture below a path
pub struct TestRunner {
    vm_runner: VmTestRunner,
    verbose: bool,
}

impl TestRunner {
    /// Create a runner applying `spec`
    pub fn new(spec: ProtocolSpec, verbose: bool) -> Self {
        Self {
            vm_runner: VmTestRunner::new(spec, verbose),
            verbose,
        }
    }

    /// Run a single fixture file, or every `*.json` file below a directory
    pub fn run_path(&self, path: &Path) -> TestResult<TestStats> {
        if path.is_file() {
            let mut stats = TestStats::new();
            let start = Instant::now();
            self.run_one(path, &mut stats);
            stats.duration = start.elapsed();
            Ok(stats)
        } else {
            self.run_directory(path)
        }
    }

    /// Run every `*.json` file below `dir`
    pub fn run_directory(&self, dir: &Path) -> TestResult<TestStats> {
        let mut stats = TestStats::new();
        let start = Instant::now();

        if self.verbose {
            tracing::info!("Running VM tests from: {}", dir.display());
        }

        self.run_recursive(dir, &mut stats)?;

        stats.duration = start.elapsed();
        Ok(stats)
    }

    fn run_recursive(&self, dir: &Path, stats: &mut TestStats) -> TestResult<()> {
        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.run_recursive(&path, stats)?;
            } else if path.extension().is_some_and(|e| e == "json") {
                self.run_one(&path, stats);
            }
        }

        Ok(())
    }

    fn run_one(&self, path: &Path, stats: &mut TestStats) {
        match self.vm_runner.run_file(path) {
            Ok(results) => {
                if self.verbose {
                    tracing::info!(
                        "File: {} - {} passed, {} failed, {} skipped",
                        path.display(),
                        results.passed.len(),
                        results.failed.len(),
                        results.skipped.len()
                    );
                }
                stats.add_vm_results(&results);
            }
            Err(e) => {
                tracing::warn!("Cannot load {}: {}", path.display(), e);
                stats.add_file_error(path, e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_pass_rate() {
        let mut stats = TestStats::new();
        stats.passed = 90;
        stats.failed = 10;
        assert!((stats.pass_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_stats_empty() {
        let stats = TestStats::new();
        assert_eq!(stats.pass_rate(), 100.0);
    }

    #[test]
    fn test_add_results() {
        let mut results = VmTestResults::new("a.json".to_string());
        results.passed.push("ok".to_string());
        results.failed.push(("bad".to_string(), "gas mismatch".to_string()));
        results.skipped.push(("odd".to_string(), "malformed".to_string()));

        let mut stats = TestStats::new();
        stats.add_vm_results(&results);
        assert_eq!(stats.total, 3);
        assert_eq!((stats.passed, stats.failed, stats.skipped), (1, 1, 1));
        assert_eq!(stats.failures[0].0, "a.json::bad");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let runner = TestRunner::new(ProtocolSpec::frontier(), false);
        assert!(runner.run_directory(Path::new("/nonexistent/fixtures")).is_err());
    }
}
