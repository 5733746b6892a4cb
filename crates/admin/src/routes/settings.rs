//! Settings pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, routing::get};
use tower_sessions::Session;

use crate::db::LookupKind;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::LayoutView;

pub fn router() -> Router<AppState> {
    Router::new().route("/settings/lookups", get(lookups))
}

/// One lookup table link.
#[derive(Debug, Clone)]
pub struct LookupLink {
    pub title: &'static str,
    pub href: String,
}

impl From<LookupKind> for LookupLink {
    fn from(kind: LookupKind) -> Self {
        Self {
            title: kind.title(),
            href: format!("/settings/lookups/{}", kind.slug()),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "settings/lookups.html")]
pub struct LookupsTemplate {
    pub layout: LayoutView,
    pub links: Vec<LookupLink>,
}

/// GET /settings/lookups
async fn lookups(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<LookupsTemplate, AppError> {
    Ok(LookupsTemplate {
        layout: LayoutView::new(&user, &session, "/settings/lookups").await,
        links: LookupKind::ALL.into_iter().map(LookupLink::from).collect(),
    })
}
