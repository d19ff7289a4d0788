//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! [`SessionContext`] wraps the Actix cookie session and a per-request cache
//! of the authenticated id. The cache lives in the request extensions, so
//! every extractor created during one request shares it, and it is dropped
//! with the request.

use std::cell::RefCell;
use std::rc::Rc;

use actix_session::Session;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::CredentialStore;
use crate::domain::{Error, User, UserId};

/// Session key and cookie name holding the signed-in user id.
pub const USER_ID_KEY: &str = "user_id";

/// Request-local slot for the authenticated id.
#[derive(Clone, Default)]
pub(crate) struct RequestSessionCache(Rc<RefCell<Option<UserId>>>);

impl RequestSessionCache {
    fn for_request(req: &HttpRequest) -> Self {
        let mut extensions = req.extensions_mut();
        if let Some(cache) = extensions.get::<Self>() {
            return cache.clone();
        }
        let cache = Self::default();
        extensions.insert(cache.clone());
        cache
    }

    fn get(&self) -> Option<UserId> {
        *self.0.borrow()
    }

    fn set(&self, id: Option<UserId>) {
        *self.0.borrow_mut() = id;
    }
}

/// Anonymous/authenticated session state for one request.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    cache: RequestSessionCache,
}

impl SessionContext {
    fn new(session: Session, cache: RequestSessionCache) -> Self {
        Self { session, cache }
    }

    /// Bind `user` to the session and cache the id for this request.
    pub fn save_user(&self, user: &User) -> Result<(), Error> {
        self.session.renew();
        self.session
            .insert(USER_ID_KEY, user.id().to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        self.cache.set(Some(*user.id()));
        Ok(())
    }

    /// Authenticated id from the request cache, falling back to the cookie.
    ///
    /// Fails with `no_session` when neither holds a valid UUID.
    pub fn user_id(&self) -> Result<UserId, Error> {
        if let Some(id) = self.cache.get() {
            return Ok(id);
        }
        let raw = self.session.get::<String>(USER_ID_KEY).unwrap_or_else(|error| {
            warn!(%error, "unreadable session value");
            None
        });
        let id = raw
            .and_then(|raw| {
                UserId::new(&raw)
                    .inspect_err(|error| warn!(%error, "invalid user id in session cookie"))
                    .ok()
            })
            .ok_or_else(Error::no_session)?;
        self.cache.set(Some(id));
        Ok(id)
    }

    /// Resolve the session's user through the credential store.
    ///
    /// Store errors propagate, so a user removed after login is `not_found`.
    pub async fn load_user(&self, credentials: &dyn CredentialStore) -> Result<User, Error> {
        let id = self.user_id()?;
        credentials.get_user(&id).await
    }

    /// Return to anonymous: expire the cookie and clear the cache.
    pub fn delete_user(&self) {
        self.session.purge();
        self.cache.set(None);
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let cache = RequestSessionCache::for_request(req);
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(|session| Self::new(session, cache)) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::FixtureCredentialStore;
    use crate::domain::{ErrorCode, Username};
    use crate::inbound::http::test_utils::{SESSION_COOKIE, test_session_middleware};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    const FIXTURE_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn admin_user() -> User {
        User::new(
            UserId::new(FIXTURE_ID).expect("fixture id"),
            Username::new("admin").expect("fixture username"),
        )
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/save",
                web::get().to(|session: SessionContext| async move {
                    session.save_user(&admin_user())?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    let user = session.load_user(&FixtureCredentialStore).await?;
                    Ok::<_, Error>(HttpResponse::Ok().body(user.id().to_string()))
                }),
            )
            .route(
                "/logout",
                web::get().to(|session: SessionContext| async move {
                    session.delete_user();
                    Ok::<_, Error>(HttpResponse::NoContent())
                }),
            )
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(Cookie::into_owned)
            .expect("session cookie set")
    }

    #[rstest]
    #[actix_web::test]
    async fn saved_user_is_loaded_on_the_next_request() {
        let app = test::init_service(session_test_app()).await;

        let saved = test::call_service(&app, test::TestRequest::get().uri("/save").to_request()).await;
        assert_eq!(saved.status(), StatusCode::OK);
        let cookie = session_cookie(&saved);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, FIXTURE_ID);
    }

    #[rstest]
    #[actix_web::test]
    async fn cache_serves_reads_within_the_saving_request() {
        let admin = admin_user();
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/",
            web::get().to(move |first: SessionContext, second: SessionContext| {
                let user = admin.clone();
                async move {
                    first.save_user(&user)?;
                    let seen = second.user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(seen.to_string()))
                }
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, FIXTURE_ID);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_then_read_in_one_request_has_no_session() {
        let admin = admin_user();
        let app = test::init_service(App::new().wrap(test_session_middleware()).route(
            "/",
            web::get().to(move |session: SessionContext| {
                let user = admin.clone();
                async move {
                    session.save_user(&user)?;
                    session.delete_user();
                    session.user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::NoSession);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_emits_an_expired_cookie() {
        let app = test::init_service(session_test_app()).await;
        let saved = test::call_service(&app, test::TestRequest::get().uri("/save").to_request()).await;
        let cookie = session_cookie(&saved);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/logout").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let removal = session_cookie(&res);
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_cookie_is_no_session() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::NoSession);
    }

    #[rstest]
    #[actix_web::test]
    async fn tampered_user_id_is_no_session() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/require").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn deleted_account_surfaces_not_found() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/save-stranger",
                    web::get().to(|session: SessionContext| async move {
                        let stranger =
                            User::new(UserId::random(), Username::new("ghost").expect("username"));
                        session.save_user(&stranger)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        session.load_user(&FixtureCredentialStore).await?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let saved = test::call_service(
            &app,
            test::TestRequest::get().uri("/save-stranger").to_request(),
        )
        .await;
        let cookie = session_cookie(&saved);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
