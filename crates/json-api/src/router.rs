//! App Router

use salvo::Router;

use crate::{access_links, auth, documents, patients, public, settings};

pub fn app_router() -> Router {
    Router::new().push(public_router()).push(tenant_router())
}

/// Viewer routes. The access token and password are the only credentials.
fn public_router() -> Router {
    Router::new()
        .push(
            Router::with_path("pq/{token}")
                .post(public::open::public_quote)
                .push(Router::with_path("approve").patch(public::approve::public_quote)),
        )
        .push(
            Router::with_path("lp/{token}")
                .post(public::open::landing_page)
                .push(Router::with_path("approve").patch(public::approve::landing_page))
                .push(Router::with_path("mark-viewed").patch(public::mark_viewed::landing_page)),
        )
}

fn tenant_router() -> Router {
    Router::with_path("tq")
        .hoop(auth::middleware::handler)
        .push(Router::with_path("patients").post(patients::create::handler))
        .push(
            Router::with_path("documents")
                .post(documents::create::handler)
                .push(
                    Router::with_path("{document}")
                        .get(documents::get::handler)
                        .put(documents::update::handler)
                        .push(Router::with_path("preview").get(documents::preview::handler)),
                ),
        )
        .push(
            Router::with_path("public-quotes")
                .post(access_links::create::public_quote)
                .push(
                    Router::with_path("by-quote/{document}").get(access_links::index::by_quote),
                )
                .push(
                    Router::with_path("{link}")
                        .delete(access_links::delete::public_quote)
                        .push(
                            Router::with_path("new-password")
                                .post(access_links::new_password::public_quote),
                        ),
                ),
        )
        .push(
            Router::with_path("landing-pages")
                .post(access_links::create::landing_page)
                .push(
                    Router::with_path("by-document/{document}")
                        .get(access_links::index::by_document),
                )
                .push(
                    Router::with_path("{link}")
                        .delete(access_links::delete::landing_page)
                        .push(
                            Router::with_path("new-password")
                                .post(access_links::new_password::landing_page),
                        ),
                ),
        )
        .push(
            Router::with_path("settings")
                .push(
                    Router::with_path("email-templates/{kind}")
                        .put(settings::email_template::handler),
                )
                .push(Router::with_path("smtp").put(settings::smtp::handler))
                .push(
                    Router::with_path("branding")
                        .get(settings::branding::get)
                        .put(settings::branding::update),
                )
                .push(Router::with_path("page-templates").post(settings::page_template::handler)),
        )
}
