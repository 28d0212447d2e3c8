//! GraphQL surface of the locale API: `i18n { ... }` on both roots.

use super::envelope::{BooleanResponse, ErrorObject};
use crate::context::CmsContext;
use crate::db_operations::CreatedBy;
use crate::i18n::{search_locale_codes, I18nError, I18nService, Locale, LOCALE_PERMISSION};
use async_graphql::{Context, EmptySubscription, InputObject, Object, Result, Schema, SimpleObject};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub type I18nSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Schema serving the locale API. Each request must carry an
/// `Arc<CmsContext>` as request data.
pub fn build_i18n_schema(service: Arc<I18nService>) -> I18nSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "I18NCreatedBy")]
pub struct CreatedByObject {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "I18NLocale")]
pub struct LocaleObject {
    pub code: String,
    pub default: bool,
    pub created_on: DateTime<Utc>,
    pub created_by: Option<CreatedByObject>,
}

impl From<Locale> for LocaleObject {
    fn from(locale: Locale) -> Self {
        Self {
            code: locale.code,
            default: locale.default,
            created_on: locale.created_on,
            created_by: locale.created_by.map(|c| CreatedByObject {
                id: Some(c.id),
                display_name: Some(c.display_name),
            }),
        }
    }
}

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(name = "I18NLocaleResponse")]
pub struct LocaleResponse {
    pub data: Option<LocaleObject>,
    pub error: Option<ErrorObject>,
}

impl LocaleResponse {
    fn ok(locale: Locale) -> Self {
        Self {
            data: Some(locale.into()),
            error: None,
        }
    }

    fn failed(error: ErrorObject) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }
}

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(name = "I18NCursors")]
pub struct CursorsObject {
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(name = "I18NListMeta")]
pub struct ListMetaObject {
    pub cursors: CursorsObject,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub total_count: i32,
}

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(name = "I18NLocaleListResponse")]
pub struct LocaleListResponse {
    pub data: Option<Vec<LocaleObject>>,
    pub meta: Option<ListMetaObject>,
    pub error: Option<ErrorObject>,
}

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
pub struct SearchLocaleCodesResponse {
    pub data: Vec<String>,
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "I18NInformationLocale")]
pub struct InformationLocale {
    pub code: String,
    pub default: bool,
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "I18NInformationCurrentLocale")]
pub struct InformationCurrentLocale {
    pub context: String,
    pub locale: String,
}

#[derive(SimpleObject, Debug, Clone, PartialEq)]
#[graphql(name = "I18NInformationResponse")]
pub struct InformationResponse {
    pub locales: Vec<InformationLocale>,
    pub current_locales: Vec<InformationCurrentLocale>,
    pub default_locale: Option<InformationLocale>,
}

#[derive(InputObject, Debug, Clone, Default)]
#[graphql(name = "I18NLocaleInput")]
pub struct LocaleInput {
    pub code: Option<String>,
    pub default: Option<bool>,
    pub created_on: Option<DateTime<Utc>>,
}

#[derive(InputObject, Debug, Clone)]
#[graphql(name = "I18NInstallInput")]
pub struct InstallInput {
    pub code: String,
}

impl From<&I18nError> for ErrorObject {
    fn from(error: &I18nError) -> Self {
        match error {
            I18nError::Store(inner) => ErrorObject::from(inner),
            other => ErrorObject::new(other.code(), other.to_string()),
        }
    }
}

fn request<'a>(ctx: &Context<'a>) -> Result<(&'a Arc<I18nService>, &'a Arc<CmsContext>)> {
    Ok((ctx.data::<Arc<I18nService>>()?, ctx.data::<Arc<CmsContext>>()?))
}

fn authorized(context: &CmsContext) -> bool {
    context.security.get_permission(LOCALE_PERMISSION).is_some()
}

fn created_by(context: &CmsContext) -> Option<CreatedBy> {
    context.security.identity.as_ref().map(|identity| CreatedBy {
        id: identity.id.clone(),
        display_name: identity.display_name.clone(),
        identity_type: identity.identity_type.clone(),
    })
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[graphql(name = "i18n")]
    async fn i18n(&self) -> I18nQuery {
        I18nQuery
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[graphql(name = "i18n")]
    async fn i18n(&self) -> I18nMutation {
        I18nMutation
    }
}

pub struct I18nQuery;

#[Object(name = "I18NQuery")]
impl I18nQuery {
    #[graphql(name = "getI18NLocale")]
    async fn get_locale(&self, ctx: &Context<'_>, code: String) -> Result<LocaleResponse> {
        let (service, context) = request(ctx)?;
        if !authorized(context) {
            return Ok(LocaleResponse::failed(ErrorObject::not_authorized()));
        }
        let response = match service.get_by_code(&context.tenant, &code) {
            Ok(Some(locale)) => LocaleResponse::ok(locale),
            Ok(None) => LocaleResponse::failed((&I18nError::NotFound(code)).into()),
            Err(e) => LocaleResponse::failed((&e).into()),
        };
        Ok(response)
    }

    #[graphql(name = "listI18NLocales")]
    async fn list_locales(&self, ctx: &Context<'_>) -> Result<LocaleListResponse> {
        let (service, context) = request(ctx)?;
        if !authorized(context) {
            return Ok(LocaleListResponse {
                error: Some(ErrorObject::not_authorized()),
                ..Default::default()
            });
        }
        let response = match service.list(&context.tenant) {
            Ok(locales) => LocaleListResponse {
                meta: Some(ListMetaObject {
                    total_count: i32::try_from(locales.len()).unwrap_or(i32::MAX),
                    ..Default::default()
                }),
                data: Some(locales.into_iter().map(LocaleObject::from).collect()),
                error: None,
            },
            Err(e) => LocaleListResponse {
                error: Some((&e).into()),
                ..Default::default()
            },
        };
        Ok(response)
    }

    #[graphql(name = "getI18NInformation")]
    async fn information(&self, ctx: &Context<'_>) -> Result<InformationResponse> {
        let (service, context) = request(ctx)?;
        let info = service
            .information(&context.tenant, &context.locale)
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let to_locale = |l: crate::i18n::Locale| InformationLocale {
            code: l.code,
            default: l.default,
        };
        Ok(InformationResponse {
            locales: info.locales.into_iter().map(to_locale).collect(),
            current_locales: info
                .current_locales
                .into_iter()
                .map(|c| InformationCurrentLocale {
                    context: c.context,
                    locale: c.locale,
                })
                .collect(),
            default_locale: info.default_locale.map(to_locale),
        })
    }

    async fn search_locale_codes(&self, search: Option<String>) -> SearchLocaleCodesResponse {
        SearchLocaleCodesResponse {
            data: search_locale_codes(search.as_deref()),
        }
    }

    async fn version(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        let (service, context) = request(ctx)?;
        let Some(tenant) = context.security.tenant.as_deref() else {
            return Ok(None);
        };
        service
            .version(tenant)
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}

pub struct I18nMutation;

#[Object(name = "I18NMutation")]
impl I18nMutation {
    async fn install(&self, ctx: &Context<'_>, data: InstallInput) -> Result<BooleanResponse> {
        let (service, context) = request(ctx)?;
        let response = match service.install(&context.tenant, &data.code, created_by(context)) {
            Ok(()) => BooleanResponse::ok(true),
            Err(e) => BooleanResponse::failed((&e).into()),
        };
        Ok(response)
    }

    #[graphql(name = "createI18NLocale")]
    async fn create_locale(&self, ctx: &Context<'_>, data: LocaleInput) -> Result<LocaleResponse> {
        let (service, context) = request(ctx)?;
        if !authorized(context) {
            return Ok(LocaleResponse::failed(ErrorObject::not_authorized()));
        }
        let Some(code) = data.code.filter(|code| !code.trim().is_empty()) else {
            return Ok(LocaleResponse::failed(ErrorObject::new(
                None,
                "Locale code is required.",
            )));
        };

        let mut locale = Locale::new(code).with_created_by(created_by(context));
        locale.default = data.default.unwrap_or(false);
        if let Some(created_on) = data.created_on {
            locale.created_on = created_on;
        }

        let response = match service.create(&context.tenant, locale) {
            Ok(locale) => LocaleResponse::ok(locale),
            Err(e) => LocaleResponse::failed((&e).into()),
        };
        Ok(response)
    }

    #[graphql(name = "updateI18NLocale")]
    async fn update_locale(
        &self,
        ctx: &Context<'_>,
        code: String,
        data: LocaleInput,
    ) -> Result<LocaleResponse> {
        let (service, context) = request(ctx)?;
        if !authorized(context) {
            return Ok(LocaleResponse::failed(ErrorObject::not_authorized()));
        }
        let response = match service.update(&context.tenant, &code, data.default) {
            Ok(locale) => LocaleResponse::ok(locale),
            Err(e) => LocaleResponse::failed((&e).into()),
        };
        Ok(response)
    }

    #[graphql(name = "deleteI18NLocale")]
    async fn delete_locale(&self, ctx: &Context<'_>, code: String) -> Result<LocaleResponse> {
        let (service, context) = request(ctx)?;
        if !authorized(context) {
            return Ok(LocaleResponse::failed(ErrorObject::not_authorized()));
        }
        let response = match service.delete(&context.tenant, &code) {
            Ok(locale) => LocaleResponse::ok(locale),
            Err(e) => LocaleResponse::failed((&e).into()),
        };
        Ok(response)
    }
}
