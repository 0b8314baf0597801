use actix_web::cookie::Cookie;
use actix_web::cookie::time::Duration;
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use crate::config::ReferralConfig;
use crate::errors::AuroraError;
use crate::services::{ClickContext, ReferralService};

/// 落地页上的推荐码查询参数名
pub const REF_QUERY_PARAM: &str = "ref";

pub struct ReferralRedirectService;

impl ReferralRedirectService {
    pub async fn handle_referral(
        req: HttpRequest,
        path: web::Path<String>,
        service: web::Data<ReferralService>,
        settings: web::Data<ReferralConfig>,
    ) -> Result<HttpResponse, AuroraError> {
        let raw_code = path.into_inner();
        let context = Self::click_context(&req);

        // 查询失败直接冒泡为 500
        let resolved = service.resolve(&raw_code, context).await?;
        trace!("Referral '{}' resolved to {:?}", raw_code, resolved);

        Ok(Self::build_redirect(&settings, resolved.as_deref()))
    }

    /// `{prefix}` 与 `{prefix}/`：没有推荐码
    pub async fn handle_empty(settings: web::Data<ReferralConfig>) -> HttpResponse {
        Self::build_redirect(&settings, None)
    }

    /// 缺失或非 UTF-8 的请求头视为空字符串
    #[inline]
    fn header_or_empty<'a>(req: &'a HttpRequest, name: &str) -> &'a str {
        req.headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("")
    }

    fn click_context(req: &HttpRequest) -> ClickContext {
        // X-Forwarded-For 可能是列表，第一个是客户端
        let ip = Self::header_or_empty(req, "x-forwarded-for")
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        ClickContext {
            ip,
            user_agent: Self::header_or_empty(req, "user-agent").to_string(),
        }
    }

    fn build_redirect(settings: &ReferralConfig, code: Option<&str>) -> HttpResponse {
        let Some(code) = code else {
            return HttpResponse::Found()
                .insert_header((LOCATION, settings.landing_path.as_str()))
                .finish();
        };

        let location = Self::landing_url(&settings.landing_path, code);

        let cookie = Cookie::build(
            settings.cookie_name.clone(),
            urlencoding::encode(code).into_owned(),
        )
        .path("/")
        .max_age(Duration::seconds(settings.cookie_max_age_secs))
        .finish();

        HttpResponse::Found()
            .insert_header((LOCATION, location))
            .cookie(cookie)
            .finish()
    }

    #[inline]
    fn landing_url(landing_path: &str, code: &str) -> String {
        let separator = if landing_path.contains('?') { "&" } else { "?" };
        format!(
            "{}{}{}={}",
            landing_path,
            separator,
            REF_QUERY_PARAM,
            urlencoding::encode(code)
        )
    }
}

/// 推荐链接路由
pub fn referral_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .route("", web::get().to(ReferralRedirectService::handle_empty))
        .route("/", web::get().to(ReferralRedirectService::handle_empty))
        .route(
            "/{code}",
            web::get().to(ReferralRedirectService::handle_referral),
        )
}
