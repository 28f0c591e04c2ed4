//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over HTTP/WebSocket (jsonrpsee). One method per orchestrator operation.

use crate::handler::RpcHandler;
use crate::types::{
    ApplicationIdParams, ApplicationOutcomeParams, ApplicationReasonParams, CatalogNameParams,
    ChangeStatusParams, CommentParams, InterviewIdParams, JobIdParams, ListApplicationsParams,
    ListCatalogParams, ListInterviewsParams, ListJobsParams, OfferParams, UpdateJobParams,
    ValidationOutcomeParams,
};
use hireflow_core::application::{
    ApplyRequest, CreateCatalogEntryRequest, CreateJobRequest, Orchestrator,
    ScheduleInterviewRequest, UpdateCatalogEntryRequest,
};
use hireflow_core::error::{AppError, Result};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// `method.v1` whose params object is required
macro_rules! register {
    ($module:expr, $method:literal, $params:ty, $call:ident) => {
        $module
            .register_async_method($method, |params, handler, _| async move {
                let req: $params = params.parse()?;
                handler.$call(req).await
            })
            .map_err(|e| AppError::Internal(format!("register {}: {}", $method, e)))?;
    };
}

/// `method.v1` whose params may be omitted entirely (list calls)
macro_rules! register_optional {
    ($module:expr, $method:literal, $params:ty, $call:ident) => {
        $module
            .register_async_method($method, |params, handler, _| async move {
                let req: Option<$params> = params.parse()?;
                handler.$call(req.unwrap_or_default()).await
            })
            .map_err(|e| AppError::Internal(format!("register {}: {}", $method, e)))?;
    };
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: RpcHandler,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, orchestrator: &Orchestrator) -> Self {
        Self {
            config,
            handler: RpcHandler::new(orchestrator),
        }
    }

    fn build_module(handler: RpcHandler) -> Result<RpcModule<RpcHandler>> {
        let mut module = RpcModule::new(handler);

        register!(module, "job.create.v1", CreateJobRequest, create_job);
        register!(module, "job.get.v1", JobIdParams, get_job);
        register_optional!(module, "job.list.v1", ListJobsParams, list_jobs);
        register!(module, "job.update.v1", UpdateJobParams, update_job);
        register!(
            module,
            "job.mark_validation_outcome.v1",
            ValidationOutcomeParams,
            mark_validation_outcome
        );
        register!(module, "job.retry.v1", JobIdParams, retry_job);
        register!(module, "job.close.v1", JobIdParams, close_job);

        register!(module, "application.apply.v1", ApplyRequest, apply);
        register!(module, "application.get.v1", ApplicationIdParams, get_application);
        register_optional!(
            module,
            "application.list.v1",
            ListApplicationsParams,
            list_applications
        );
        register!(
            module,
            "application.mark_outcome.v1",
            ApplicationOutcomeParams,
            mark_application_outcome
        );
        register!(module, "application.change_status.v1", ChangeStatusParams, change_status);
        register!(module, "application.view.v1", ApplicationIdParams, view_application);
        register!(module, "application.comment.v1", CommentParams, add_comment);
        register!(module, "application.retry.v1", ApplicationIdParams, retry_application);
        register!(
            module,
            "application.withdraw.v1",
            ApplicationReasonParams,
            withdraw_application
        );
        register!(module, "application.offer.v1", OfferParams, offer_job);
        register!(module, "application.accept_offer.v1", ApplicationIdParams, accept_offer);
        register!(module, "application.decline_offer.v1", ApplicationReasonParams, decline_offer);

        register!(module, "interview.schedule.v1", ScheduleInterviewRequest, schedule_interview);
        register!(module, "interview.get.v1", InterviewIdParams, get_interview);
        register_optional!(module, "interview.list.v1", ListInterviewsParams, list_interviews);
        register!(module, "interview.accept.v1", InterviewIdParams, accept_interview);
        register!(module, "interview.reject.v1", InterviewIdParams, reject_interview);
        register!(module, "interview.cancel.v1", InterviewIdParams, cancel_interview);
        register!(module, "interview.complete.v1", InterviewIdParams, complete_interview);

        register!(module, "category.create.v1", CreateCatalogEntryRequest, create_category);
        register!(module, "category.update.v1", UpdateCatalogEntryRequest, update_category);
        register_optional!(module, "category.list.v1", ListCatalogParams, list_categories);
        register!(module, "category.get_by_name.v1", CatalogNameParams, get_category_by_name);
        register!(module, "skill.create.v1", CreateCatalogEntryRequest, create_skill);
        register!(module, "skill.update.v1", UpdateCatalogEntryRequest, update_skill);
        register_optional!(module, "skill.list.v1", ListCatalogParams, list_skills);
        register!(module, "skill.get_by_name.v1", CatalogNameParams, get_skill_by_name);

        Ok(module)
    }

    /// Bind and start serving; returns the bound address and the server handle
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to build server on {}: {}", addr, e)))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| AppError::Internal(format!("No local address: {}", e)))?;

        let module = Self::build_module(self.handler)?;
        let methods = module.method_names().count();
        let handle = server.start(module);

        info!(addr = %local_addr, methods, "JSON-RPC server started successfully");
        Ok((local_addr, handle))
    }
}
