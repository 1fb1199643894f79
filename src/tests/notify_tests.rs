use super::*;

#[test]
fn toast_log_keeps_only_recent_history() {
    let mut log = ToastLog::default();
    for i in 0..TOAST_HISTORY + 25 {
        log.show(Toast::success(format!("toast {}", i)));
    }
    assert_eq!(log.toasts.len(), TOAST_HISTORY);
    assert_eq!(log.toasts[0].title, "toast 25");
    assert_eq!(
        log.last().unwrap().title,
        format!("toast {}", TOAST_HISTORY + 24)
    );
}

#[test]
fn failure_title_falls_back_on_blank_messages() {
    let err = anyhow::anyhow!("  ");
    assert_eq!(failure_title(&err, "Could not copy"), "Could not copy");
    let err = anyhow::anyhow!("boom").context("upload");
    assert_eq!(failure_title(&err, "Could not copy"), "upload: boom");
}
