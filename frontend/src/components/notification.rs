//! 全局提示条
//!
//! 任何组件都可以通过 [`use_notice`] 发出一条提示，5 秒后自动消失；
//! 新提示会替换旧提示并重新计时。

use leptos::prelude::*;
use std::time::Duration;

const NOTICE_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn alert_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "alert alert-success shadow-lg",
            NoticeKind::Warning => "alert alert-warning shadow-lg",
            NoticeKind::Error => "alert alert-error shadow-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct NoticeContext {
    current: RwSignal<Option<Notice>>,
}

impl NoticeContext {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
        }
    }

    pub fn show(&self, kind: NoticeKind, message: impl Into<String>) {
        self.current.set(Some(Notice {
            kind,
            message: message.into(),
        }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(NoticeKind::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(NoticeKind::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(NoticeKind::Error, message);
    }

    pub fn clear(&self) {
        self.current.set(None);
    }
}

pub fn use_notice() -> NoticeContext {
    use_context::<NoticeContext>().expect("NoticeContext should be provided")
}

#[component]
pub fn NotificationToast() -> impl IntoView {
    let notice = use_notice();
    let timer = StoredValue::new(None::<TimeoutHandle>);

    Effect::new(move |_| {
        if let Some(handle) = timer.get_value() {
            handle.clear();
        }
        if notice.current.with(Option::is_some) {
            let handle = set_timeout_with_handle(
                move || notice.clear(),
                Duration::from_millis(NOTICE_MS),
            )
            .ok();
            timer.set_value(handle);
        }
    });

    move || {
        notice.current.get().map(|n| {
            view! {
                <div class="toast toast-top toast-end z-[60]">
                    <div class=n.kind.alert_class()>
                        <span>{n.message}</span>
                        <button class="btn btn-ghost btn-xs" on:click=move |_| notice.clear()>
                            "✕"
                        </button>
                    </div>
                </div>
            }
        })
    }
}
