/// Static about pages.
use actix_web::HttpResponse;

pub async fn about_author() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "title": "Об авторе",
        "text": "Учебный сервис микроблогов: посты, группы, комментарии и подписки.",
    }))
}

pub async fn about_tech() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "title": "Технологии",
        "text": "actix-web, sqlx и PostgreSQL.",
    }))
}
