pub mod countdown_watcher;
pub mod rankings;
