//! Dashboard Routes
//!
//! Read-only views of the latest refresh for the rendering layer.
//!
//! - GET /api/v1/dashboard - Full dashboard view
//! - GET /api/v1/summary - Headline metrics
//! - GET /api/v1/categories - Category detail cards
//! - GET /api/v1/theme - Colour palette

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CategoriesResponse, SummaryResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::config::Theme;
use crate::sales::DashboardView;

/// GET /api/v1/dashboard
///
/// Everything needed to draw the page: metric cards, chart series and
/// category details.
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let view = latest_view(&state).await?;
    Ok(Json(view.as_ref()).into_response())
}

/// GET /api/v1/summary
pub async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<SummaryResponse>> {
    let view = latest_view(&state).await?;

    Ok(Json(SummaryResponse {
        generated_at: view.generated_at,
        summary: view.summary.clone(),
        headline: view.headline.clone(),
    }))
}

/// GET /api/v1/categories
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CategoriesResponse>> {
    let view = latest_view(&state).await?;

    Ok(Json(CategoriesResponse {
        generated_at: view.generated_at,
        categories: view.category_details.clone(),
    }))
}

/// GET /api/v1/theme
pub async fn get_theme(State(state): State<Arc<AppState>>) -> Json<Theme> {
    Json(state.theme.as_ref().clone())
}

async fn latest_view(state: &AppState) -> ApiResult<Arc<DashboardView>> {
    state.refresh.latest().await.ok_or_else(|| {
        ApiError::ServiceUnavailable("dashboard has not been refreshed yet".to_string())
    })
}
