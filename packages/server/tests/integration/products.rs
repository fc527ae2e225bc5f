use serde_json::json;

use shop_server::entity::user;

use crate::common::{TestApp, image_count, product_count, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_create_a_product() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;

        let body = app
            .create_product(&token, "Men's Quilted Jacket", &["q1.jpg", "q2.jpg"])
            .await;

        assert_eq!(body["title"], "Men's Quilted Jacket");
        assert_eq!(body["slug"], "mens_quilted_jacket");
        assert_eq!(body["images"], json!(["q1.jpg", "q2.jpg"]));
        assert_eq!(body["price"], 25.5);
        assert!(body["user_id"].is_string());
    }

    #[tokio::test]
    async fn price_and_stock_default_to_zero() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;

        let res = app
            .post_with_token(
                routes::PRODUCTS,
                &json!({"title": "Plain", "sizes": ["M"], "gender": "men"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["price"], 0.0);
        assert_eq!(res.body["stock"], 0);
        assert_eq!(res.body["images"], json!([]));
    }

    #[tokio::test]
    async fn requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::PRODUCTS,
                &json!({"title": "Plain", "sizes": ["M"], "gender": "men"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_invalid_payloads() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;

        let res = app
            .post_with_token(
                routes::PRODUCTS,
                &json!({"title": "Plain", "sizes": ["M"], "gender": "robot"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post_with_token(routes::PRODUCTS, &json!({"title": "Plain"}), &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(product_count(&app.db).await, 0);
    }

    #[tokio::test]
    async fn slugs_that_normalize_to_nothing_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;

        let res = app
            .post_with_token(
                routes::PRODUCTS,
                &json!({"title": "Plain", "slug": "'", "sizes": ["M"], "gender": "men"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(product_count(&app.db).await, 0);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;
        app.create_product(&token, "Widget", &["a.png"]).await;

        let res = app
            .post_with_token(
                routes::PRODUCTS,
                &json!({
                    "title": "Other",
                    "slug": "widget",
                    "sizes": ["M"],
                    "gender": "men",
                    "images": ["b.png"],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 409, "{}", res.text);
        assert_eq!(res.body["code"], "CONFLICT");
        assert_eq!(product_count(&app.db).await, 1);
        assert_eq!(image_count(&app.db).await, 1);
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn list_is_paginated_and_public() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;
        for title in ["One", "Two", "Three"] {
            app.create_product(&token, title, &["x.png"]).await;
        }

        let res = app
            .get_without_token(&format!("{}?limit=2&offset=0", routes::PRODUCTS))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 2);

        let res = app
            .get_without_token(&format!("{}?limit=2&offset=2", routes::PRODUCTS))
            .await;
        assert_eq!(res.body.as_array().unwrap().len(), 1);
        assert_eq!(res.body[0]["images"], json!(["x.png"]));

        let res = app.get_without_token(routes::PRODUCTS).await;
        assert_eq!(res.body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?limit=0", routes::PRODUCTS))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn get_resolves_id_title_and_slug() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;
        let created = app.create_product(&token, "Chill Hoodie", &["h.png"]).await;
        let id = created["id"].as_str().unwrap();

        for term in [id, "chill%20HOODIE", "CHILL_HOODIE"] {
            let res = app.get_without_token(&routes::product(term)).await;
            assert_eq!(res.status, 200, "term {term}: {}", res.text);
            assert_eq!(res.body["id"], id);
            assert_eq!(res.body["images"], json!(["h.png"]));
        }
    }

    #[tokio::test]
    async fn hex_slug_is_looked_up_as_a_slug() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;
        let res = app
            .post_with_token(
                routes::PRODUCTS,
                &json!({
                    "title": "Hex",
                    "slug": "0123456789abcdef0123456789abcdef",
                    "sizes": ["M"],
                    "gender": "men",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let found = app
            .get_without_token(&routes::product("0123456789abcdef0123456789abcdef"))
            .await;

        assert_eq!(found.status, 200, "{}", found.text);
        assert_eq!(found.body["id"], res.body["id"]);
    }

    #[tokio::test]
    async fn get_unknown_term_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::product("nothing")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Product with term 'nothing' not found");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn admin_can_patch_fields_and_replace_images() {
        let app = TestApp::spawn().await;
        let user_token = app.user_token().await;
        let admin_token = app.admin_token().await;
        let created = app.create_product(&user_token, "Widget", &["a.png", "b.png"]).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .patch_with_token(
                &routes::product(id),
                &json!({"stock": 9, "images": ["c.png"]}),
                &admin_token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["stock"], 9);
        assert_eq!(res.body["title"], "Widget");
        assert_eq!(res.body["images"], json!(["c.png"]));
        assert_ne!(res.body["user_id"], created["user_id"]);
    }

    #[tokio::test]
    async fn omitted_images_are_kept() {
        let app = TestApp::spawn().await;
        let admin_token = app.admin_token().await;
        let created = app.create_product(&admin_token, "Widget", &["a.png"]).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .patch_with_token(&routes::product(id), &json!({"price": 99.0}), &admin_token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["price"], 99.0);
        assert_eq!(res.body["images"], json!(["a.png"]));
    }

    #[tokio::test]
    async fn plain_users_are_forbidden() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;
        let created = app.create_product(&token, "Widget", &[]).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .patch_with_token(&routes::product(id), &json!({"stock": 1}), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn super_users_may_update() {
        let app = TestApp::spawn().await;
        let token = app
            .create_user_with_roles("super@shop.test", &[user::SUPER_USER_ROLE])
            .await;
        let created = app.create_product(&token, "Widget", &[]).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .patch_with_token(&routes::product(id), &json!({"stock": 1}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn non_uuid_ids_and_unknown_ids_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .patch_with_token(&routes::product("widget"), &json!({"stock": 1}), &token)
            .await;
        assert_eq!(res.status, 400);

        let missing = uuid::Uuid::new_v4().to_string();
        let res = app
            .patch_with_token(&routes::product(&missing), &json!({"stock": 1}), &token)
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn slug_collision_keeps_the_product_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_product(&token, "Taken", &[]).await;
        let created = app.create_product(&token, "Widget", &["a.png", "b.png"]).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .patch_with_token(
                &routes::product(id),
                &json!({"slug": "taken", "images": ["z.png"]}),
                &token,
            )
            .await;
        assert_eq!(res.status, 409, "{}", res.text);

        let res = app.get_without_token(&routes::product(id)).await;
        assert_eq!(res.body["slug"], "widget");
        assert_eq!(res.body["images"], json!(["a.png", "b.png"]));
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn admin_can_delete_by_slug() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_product(&token, "Widget", &["a.png"]).await;

        let res = app.delete_with_token(&routes::product("widget"), &token).await;

        assert_eq!(res.status, 204);
        assert_eq!(product_count(&app.db).await, 0);
        assert_eq!(image_count(&app.db).await, 0);
    }

    #[tokio::test]
    async fn deleting_an_unknown_product_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        app.create_product(&token, "Widget", &["a.png"]).await;

        let res = app.delete_with_token(&routes::product("gadget"), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(product_count(&app.db).await, 1);
    }

    #[tokio::test]
    async fn plain_users_are_forbidden() {
        let app = TestApp::spawn().await;
        let token = app.user_token().await;
        app.create_product(&token, "Widget", &[]).await;

        let res = app.delete_with_token(&routes::product("widget"), &token).await;

        assert_eq!(res.status, 403);
        assert_eq!(product_count(&app.db).await, 1);
    }
}
