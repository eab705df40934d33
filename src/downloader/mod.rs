//! Core downloader implementation, decomposed into focused submodules:
//! task lifecycle and control surface ([`task`]), the byte-pumping transfer
//! loop ([`transfer`]), and terminal notification dispatch ([`dispatch`]).

mod dispatch;
mod task;
mod transfer;


pub use task::DownloadTask;
