//! 内联 SVG 图标（stroke 风格，24x24）
//!
//! 使用 `attr:class` 控制尺寸与颜色。

use leptos::prelude::*;

fn stroke_svg(paths: &'static [&'static str]) -> impl IntoView {
    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            fill="none"
            viewBox="0 0 24 24"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
        >
            {paths.iter().map(|d| view! { <path d=*d /> }).collect_view()}
        </svg>
    }
}

#[component]
pub fn LockClosed() -> impl IntoView {
    stroke_svg(&["M6 11V8a6 6 0 0 1 12 0v3", "M5 11h14v10H5z"])
}

#[component]
pub fn CalendarPlus() -> impl IntoView {
    stroke_svg(&[
        "M8 2v4",
        "M16 2v4",
        "M3 8h18",
        "M3 4h18v17H3z",
        "M12 12v6",
        "M9 15h6",
    ])
}

#[component]
pub fn PencilSquare() -> impl IntoView {
    stroke_svg(&[
        "M11 4H4v16h16v-7",
        "M18.5 2.5a2.1 2.1 0 0 1 3 3L12 15l-4 1 1-4z",
    ])
}

#[component]
pub fn ChartBar() -> impl IntoView {
    stroke_svg(&["M3 3v18h18", "M8 17v-5", "M13 17V8", "M18 17v-9"])
}

#[component]
pub fn Squares() -> impl IntoView {
    stroke_svg(&["M3 3h7v7H3z", "M14 3h7v7h-7z", "M3 14h7v7H3z", "M14 14h7v7h-7z"])
}

#[component]
pub fn LogOut() -> impl IntoView {
    stroke_svg(&["M9 21H5V3h4", "M16 17l5-5-5-5", "M21 12H9"])
}

#[component]
pub fn Trash2() -> impl IntoView {
    stroke_svg(&[
        "M3 6h18",
        "M8 6V4h8v2",
        "M19 6l-1 14H6L5 6",
        "M10 11v6",
        "M14 11v6",
    ])
}

#[component]
pub fn Eye() -> impl IntoView {
    stroke_svg(&[
        "M1 12s4-8 11-8 11 8 11 8-4 8-11 8S1 12 1 12z",
        "M12 9a3 3 0 1 0 0 6 3 3 0 0 0 0-6z",
    ])
}

#[component]
pub fn EyeOff() -> impl IntoView {
    stroke_svg(&[
        "M17.9 17.9A10.1 10.1 0 0 1 12 20C5 20 1 12 1 12a18.5 18.5 0 0 1 5.1-5.9",
        "M9.9 4.2A9.1 9.1 0 0 1 12 4c7 0 11 8 11 8a18.5 18.5 0 0 1-2.2 3.2",
        "M14.1 14.1a3 3 0 1 1-4.2-4.2",
        "M1 1l22 22",
    ])
}

#[component]
pub fn Plus() -> impl IntoView {
    stroke_svg(&["M12 5v14", "M5 12h14"])
}

#[component]
pub fn RefreshCw() -> impl IntoView {
    stroke_svg(&[
        "M23 4v6h-6",
        "M1 20v-6h6",
        "M3.5 9a9 9 0 0 1 14.9-3.4L23 10",
        "M1 14l4.6 4.4A9 9 0 0 0 20.5 15",
    ])
}

#[component]
pub fn CheckCircle() -> impl IntoView {
    stroke_svg(&["M22 11.1V12a10 10 0 1 1-5.9-9.1", "M22 4L12 14l-3-3"])
}

#[component]
pub fn ArrowLeft() -> impl IntoView {
    stroke_svg(&["M19 12H5", "M12 19l-7-7 7-7"])
}
