//! Shop Admin Frontend Entry Point

mod app;
mod commands;
mod components;
mod context;
mod models;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

const APP_LOG_NAME: &str = "ShopAdmin";

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger(APP_LOG_NAME, rolling_logger::DEFAULT_CAPACITY) {
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
    }
    mount_to_body(App);
}
