use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    errors::AppError,
    layout::masonry::{layout, ColumnSpec},
};

const MAX_ITEMS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct GalleryLayoutRequest {
    pub container_width: f64,
    pub viewport_width: f64,
    pub item_heights: Vec<f64>,
}

/// Precomputes masonry positions for clients that cannot measure the DOM themselves.
#[post("/layout")]
pub async fn gallery_layout(request: web::Json<GalleryLayoutRequest>) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    if request.item_heights.len() > MAX_ITEMS {
        return Err(AppError::BadRequest(format!("At most {} items can be laid out", MAX_ITEMS)));
    }
    let all_finite = request
        .item_heights
        .iter()
        .chain([&request.container_width, &request.viewport_width])
        .all(|v| v.is_finite() && *v >= 0.0);
    if !all_finite {
        return Err(AppError::BadRequest("Widths and heights must be non-negative numbers".to_string()));
    }

    let spec = ColumnSpec::for_viewport(request.viewport_width);
    Ok(HttpResponse::Ok().json(layout(request.container_width, spec, &request.item_heights)))
}
