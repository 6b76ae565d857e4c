use crate::api::build_app;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{RowStore, XlsxWorkbookStore};
use crate::services::QuestionStore;
use crate::state::AppState;
use crate::utils::logging::log_startup;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    /// 初始化应用：加载题目，构建服务上下文
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let questions = Arc::new(QuestionStore::load(&config.questions_file).await?);
        if questions.is_empty() {
            warn!("⚠️ 题目列表为空，只有空答案的提交会被接受");
        }

        log_startup(&config, questions.len());

        let store: Arc<dyn RowStore> = Arc::new(XlsxWorkbookStore::new(
            config.results_path(),
            config.sheet_name.clone(),
        ));
        let state = AppState::new(&config, questions, store);

        Ok(Self { config, state })
    }

    pub fn router(&self) -> Router {
        build_app(self.state.clone(), &self.config.static_dir)
    }

    /// 运行 HTTP 服务，直到收到 Ctrl-C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听地址: {}", self.config.bind_addr))?;
        info!("✓ 服务已启动: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C 信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭...");
}
