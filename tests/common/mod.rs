//! In-process fake pricing service for integration tests.

#![allow(dead_code)]

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use prefab_estimate::config::PricingConfig;
use prefab_estimate::pricing::HttpPricingService;
use serde_json::{Value, json};
use std::net::SocketAddr;

/// How the fake service answers.
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// Echo the request into a fixed breakdown.
    Price,
    /// 422 with a field-level detail list.
    Reject,
    /// 500 with an HTML body.
    Crash,
    /// 200 with a body that is not an estimate.
    Garbage,
}

/// The breakdown the fake service returns for a request.
pub fn breakdown(request: &Value) -> Value {
    let length = request["house"]["length_m"].as_f64().unwrap_or_default();
    let width = request["house"]["width_m"].as_f64().unwrap_or_default();
    let commission = request["commission_rub"].as_f64().unwrap_or_default();

    json!({
        "Габариты": {
            "Площадь_теплого_контура_м2": length * width,
            "Площадь_террас_м2": 0.0,
            "Площадь_крылец_м2": 0.0,
            "Высота_потолка_м": request["ceiling"]["height_m"],
            "Тип_потолка": request["ceiling"]["type"],
            "Повышение_конька_см": request["ceiling"]["ridge_delta_cm"].as_i64().unwrap_or(0),
            "Вынос_крыши": request["roof"]["overhang_cm"]
        },
        "Окна_и_двери": {
            "Стандартные_окна": [
                {"Размер": "100x100", "Тип": "povorot_otkid", "Колво": 4, "Цена_шт_руб": 15000.0, "Сумма_руб": 60000.0}
            ],
            "Двери": [
                {"Наименование": "Входная дверь", "Колво": 1, "Цена_шт_руб": 25000.0, "Сумма_руб": 25000.0}
            ],
            "Итого_по_разделу_руб": 85000.0
        },
        "Конструктив": {
            "База_руб": 1500000.0,
            "Дополнения": [
                {"Код": "ROOF-01", "Наименование": "Утепление крыши", "Расчёт": "100.5 м2 * 500 руб/м2", "Сумма_руб": 50250.0}
            ],
            "Доставка_руб": 10000.0
        },
        "Итоговая_стоимость": {
            "Итого_без_комиссии_руб": 1645250.0,
            "Комиссия_руб": commission,
            "Окончательная_цена_руб": 1645250.0 + commission
        }
    })
}

async fn respond(behaviour: Behaviour, request: Value) -> impl IntoResponse {
    let (status, body) = match behaviour {
        Behaviour::Price => (StatusCode::OK, breakdown(&request).to_string()),
        Behaviour::Reject => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"detail": [{
                "loc": ["body", "house", "length_m"],
                "msg": "Input should be less than 30",
                "type": "less_than"
            }]})
            .to_string(),
        ),
        Behaviour::Crash => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>Internal Server Error</html>".to_string(),
        ),
        Behaviour::Garbage => (StatusCode::OK, json!({"status": "ok"}).to_string()),
    };
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Start a fake pricing service on an ephemeral port. Returns its address.
pub async fn spawn_pricing(behaviour: Behaviour) -> SocketAddr {
    let app = Router::new().route(
        "/calculate",
        post(move |Json(request): Json<Value>| respond(behaviour, request)),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake pricing service");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// An address nothing is listening on.
pub async fn dead_address() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    listener.local_addr().expect("local addr")
}

pub fn client_for(addr: SocketAddr) -> HttpPricingService {
    HttpPricingService::new(&PricingConfig {
        endpoint: format!("http://{}/calculate", addr),
        timeout_seconds: 5,
    })
}
