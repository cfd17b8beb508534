use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wizardwalk::config::{self, QtDir};
use wizardwalk::driver::mock::MockHost;
use wizardwalk::driver::Key;
use wizardwalk::suite::{MissingQtChecks, NewProjectChecks};
use wizardwalk::walker::WizardObserver;
use wizardwalk::{
    AutomationError, NoChecks, Reporter, Session, WalkerConfig, WizardWalker,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn qt_dirs() -> Vec<QtDir> {
    config::parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019;C:\\Qt\\6.8.0:msvc2022_64")
}

fn walker_for(host: &Arc<MockHost>, config: WalkerConfig) -> (WizardWalker, Reporter) {
    let reporter = Reporter::new();
    let session = Session::new(host.clone());
    (
        WizardWalker::new(session, reporter.clone(), config),
        reporter,
    )
}

#[tokio::test]
async fn walks_every_template_and_leaves_everything_closed() {
    init_tracing();
    let host = MockHost::with_defaults();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());

    let summary = walker.run_with_dirs(&qt_dirs(), &NoChecks).await.unwrap();

    assert_eq!(summary.runs.len(), 3);
    assert_eq!(summary.succeeded(), 3);
    assert!(summary.runs.iter().all(|r| !r.cleanup_degraded));

    // Templates with a class page reach page 3, the rest stop at page 2.
    let pages: Vec<u8> = summary
        .runs
        .iter()
        .map(|r| r.result.as_ref().unwrap().pages_visited)
        .collect();
    assert_eq!(pages, [2, 3, 3]);

    // Cleanup discipline: wizard cancelled, registry emptied, host closed.
    assert!(!host.wizard_open());
    assert_eq!(host.version_row_count(), 0);
    assert!(!host.host_running());
    assert!(!reporter.report().has_failures());
}

#[tokio::test]
async fn page2_failure_is_contained_to_its_template() {
    struct FailEmptyApplication;

    #[async_trait]
    impl WizardObserver for FailEmptyApplication {
        async fn on_wizard_page2(
            &self,
            _session: &Session,
            greeting: &str,
            _qt_dirs: &[QtDir],
        ) -> Result<(), AutomationError> {
            if greeting.contains("Qt Empty Application") {
                return Err(AutomationError::BackendError(
                    "injected page-2 failure".into(),
                ));
            }
            Ok(())
        }
    }

    let host = MockHost::with_defaults();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());

    let summary = walker
        .run_with_dirs(&qt_dirs(), &FailEmptyApplication)
        .await
        .unwrap();

    assert_eq!(summary.runs.len(), 3);
    assert_eq!(summary.failed(), 1);
    let failure = summary.runs[0].result.as_ref().unwrap_err();
    assert_eq!(failure.template, "Qt Empty Application");
    assert!(failure.error.contains("injected page-2 failure"));
    // the remaining templates were still attempted
    assert!(summary.runs[1].result.is_ok());
    assert!(summary.runs[2].result.is_ok());

    // cleanup still closed the wizard for the failed template
    assert!(!host.wizard_open());
    assert!(!host.host_running());
    assert!(reporter.report().fatals > 0);
}

#[tokio::test]
async fn without_version_setup_the_wizard_cannot_finish() {
    let host = MockHost::with_defaults();
    let (walker, reporter) = walker_for(
        &host,
        WalkerConfig {
            perform_qt_version_setup: false,
        },
    );
    let observer = MissingQtChecks::new(reporter.clone());

    let summary = walker.run_with_dirs(&qt_dirs(), &observer).await.unwrap();

    assert_eq!(summary.succeeded(), 3);
    // nothing was registered, so no template gets past page 2
    assert!(summary
        .runs
        .iter()
        .all(|r| r.result.as_ref().unwrap().pages_visited == 2));
    assert_eq!(host.version_row_count(), 0);
    assert!(!reporter.report().has_failures());
}

#[tokio::test]
async fn defaults_suite_passes_against_the_scripted_host() -> anyhow::Result<()> {
    init_tracing();
    let host = MockHost::with_defaults();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());
    let observer = NewProjectChecks::new(reporter.clone(), "17.12.0".parse()?);

    let summary = walker.run_with_dirs(&qt_dirs(), &observer).await?;

    assert_eq!(summary.succeeded(), 3);
    let report = reporter.report();
    assert!(!report.has_failures(), "unexpected failures: {report:#?}");
    assert!(report.passes > 0);
    Ok(())
}

#[tokio::test]
async fn preexisting_registry_rows_abort_before_any_template() {
    let host = MockHost::builder()
        .preexisting_version("stale", "C:\\Qt\\stale")
        .build();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());

    let err = walker
        .run_with_dirs(&qt_dirs(), &NoChecks)
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::PreconditionViolation(_)));

    // no template was attempted, nothing was added, the host was closed
    assert_eq!(host.new_project_opens(), 0);
    assert_eq!(host.version_names(), ["stale"]);
    assert!(!host.host_running());
    assert!(reporter.report().fatals > 0);
}

#[tokio::test]
async fn empty_sdk_list_is_fatal_before_any_interaction() {
    let host = MockHost::with_defaults();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());

    let err = walker.run_with_dirs(&[], &NoChecks).await.unwrap_err();
    assert!(matches!(err, AutomationError::MissingEnvironment(_)));
    assert_eq!(host.new_project_opens(), 0);
    assert!(host.host_running());
    assert!(reporter.report().fatals > 0);
}

#[tokio::test]
async fn unresolvable_cancel_button_degrades_to_the_cancel_key() {
    let host = MockHost::builder()
        .templates(&["Qt Empty Application"])
        .unresolvable_cancel_button()
        .build();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());

    let summary = walker.run_with_dirs(&qt_dirs(), &NoChecks).await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert!(summary.runs[0].cleanup_degraded);
    assert!(host.pressed_keys().contains(&Key::Escape));
    assert!(!host.wizard_open());
    let report = reporter.report();
    // degraded cleanup is a warning, not a failure
    assert!(report.warnings > 0);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn transient_second_context_is_repinned_and_the_run_succeeds() {
    let host = MockHost::builder()
        .templates(&["Qt Widgets Application"])
        .second_context_defect()
        .build();
    let (walker, reporter) = walker_for(&host, WalkerConfig::default());

    let summary = walker.run_with_dirs(&qt_dirs(), &NoChecks).await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(
        summary.runs[0].result.as_ref().unwrap().pages_visited,
        3
    );
    assert!(!host.wizard_open());
    assert!(!reporter.report().has_failures());
}

#[tokio::test]
async fn run_reads_and_deduplicates_the_environment_list() {
    struct CountOfferedVersions {
        seen: Mutex<Option<usize>>,
    }

    #[async_trait]
    impl WizardObserver for CountOfferedVersions {
        async fn on_wizard_page2(
            &self,
            _session: &Session,
            _greeting: &str,
            qt_dirs: &[QtDir],
        ) -> Result<(), AutomationError> {
            *self.seen.lock().unwrap() = Some(qt_dirs.len());
            Ok(())
        }
    }

    std::env::set_var(
        config::QT_DIRS_ENV,
        "C:\\Qt\\6.5.0:msvc2019;C:\\qt\\6.5.0:msvc2019",
    );
    let host = MockHost::builder()
        .templates(&["Qt Empty Application"])
        .build();
    let (walker, _reporter) = walker_for(&host, WalkerConfig::default());
    let observer = CountOfferedVersions {
        seen: Mutex::new(None),
    };

    let summary = walker.run(&observer).await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    // the case-insensitive duplicate collapsed to a single offered version
    assert_eq!(*observer.seen.lock().unwrap(), Some(1));
}
