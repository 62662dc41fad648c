//! 原生 Web API 封装模块
//!
//! 对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，以减小 WASM 体积。

mod http;
pub mod route;
pub mod router;
mod storage;

pub use http::{HttpClient, HttpError};
pub use storage::{KEY_API_URL, KEY_SESSION_TOKEN, LocalStorage};

/// 按 id 聚焦页面元素
pub fn focus_element(id: &str) {
    use wasm_bindgen::JsCast;

    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        let _ = el.focus();
    }
}
