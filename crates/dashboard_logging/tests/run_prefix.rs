use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use dashboard_logging::{dashboard_info, dashboard_warn};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn explicit_run_overrides_the_thread_record() {
    let captured = Captured::default();
    WriteLogger::init(LevelFilter::Debug, Config::default(), captured.clone()).expect("logger");

    dashboard_logging::set_active_run(3);
    dashboard_info!("status applied");
    dashboard_info!(run = 7; "starting job {}", "olx");
    // Pool threads never record a run of their own.
    std::thread::spawn(|| dashboard_warn!(run = 9; "poll timer restarted"))
        .join()
        .unwrap();
    std::thread::spawn(|| dashboard_warn!("no run recorded here"))
        .join()
        .unwrap();

    let text = captured.text();
    assert!(text.contains("[run 3] status applied"));
    assert!(text.contains("[run 7] starting job olx"));
    assert!(text.contains("[run 9] poll timer restarted"));
    assert!(text.contains("[run 0] no run recorded here"));
    assert!(!text.contains("[run 3] starting job"));
}
