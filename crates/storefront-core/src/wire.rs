//! # Wire Format
//!
//! The backend's JSON shapes and their conversion to and from cart types.
//!
//! ## Cart Endpoint Shapes
//! ```text
//! GET /carrinho  (any of these)
//!
//!   [ {line}, {line} ]                         bare array
//!   { "items": [ {line}, ... ] }               envelope ("itens" / "data" too)
//!   { "data": { "items": [ {line}, ... ] } }   envelopes nest
//!
//! {line} = {
//!   "id": 5, "nome": "X", "quantidade": 1, "sku": "S1",
//!   "url_imagem": "u", "observacao": "", "valor_unitario": 9.9
//! }
//!
//! POST /carrinho
//!   { "items": [ {line}, ... ], "userInfo": <opaque> }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::cart::{normalize_by_id, Cart};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CartLine, CheckoutRequest, LineId};
use crate::validation::{validate_quantity, validate_sku, validate_unit_price};

/// Keys checked, in order, for the order identifier in a checkout response.
pub const ORDER_ID_KEYS: [&str; 5] = ["orderId", "order_id", "numeroPedido", "numero_pedido", "id"];

// =============================================================================
// Line DTO
// =============================================================================

/// A cart line exactly as the backend sends and expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDto {
    pub id: LineId,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "quantidade")]
    pub quantity: i64,

    pub sku: String,

    #[serde(rename = "url_imagem", default)]
    pub image_url: Option<String>,

    #[serde(rename = "observacao", default)]
    pub note: Option<String>,

    /// Kept as the backend's number so checkout can echo it unchanged.
    #[serde(rename = "valor_unitario")]
    pub unit_price: Number,
}

impl TryFrom<LineDto> for CartLine {
    type Error = CoreError;

    fn try_from(dto: LineDto) -> CoreResult<Self> {
        let invalid = |source: ValidationError| CoreError::InvalidLine { id: dto.id, source };

        validate_sku(&dto.sku).map_err(invalid)?;
        let quantity = validate_quantity(dto.quantity).map_err(invalid)?;
        let unit_price =
            validate_unit_price(dto.unit_price.as_f64().unwrap_or(f64::NAN)).map_err(invalid)?;

        Ok(CartLine {
            id: dto.id,
            name: dto.name,
            quantity,
            sku: dto.sku,
            image_url: dto.image_url.unwrap_or_default(),
            note: dto.note.unwrap_or_default(),
            unit_price,
            listed_price: Some(dto.unit_price),
        })
    }
}

impl From<&CartLine> for LineDto {
    fn from(line: &CartLine) -> Self {
        LineDto {
            id: line.id,
            name: line.name.clone(),
            quantity: i64::from(line.quantity),
            sku: line.sku.clone(),
            image_url: Some(line.image_url.clone()),
            note: Some(line.note.clone()),
            unit_price: line
                .listed_price
                .clone()
                .or_else(|| Number::from_f64(line.unit_price.to_decimal()))
                .unwrap_or_else(|| Number::from(0)),
        }
    }
}

// =============================================================================
// Cart Payload (GET)
// =============================================================================

/// Any accepted shape of the cart response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CartPayload {
    Lines(Vec<LineDto>),
    Envelope(Envelope),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(alias = "itens", alias = "data")]
    items: Box<CartPayload>,
}

impl CartPayload {
    fn into_lines(self) -> Vec<LineDto> {
        match self {
            CartPayload::Lines(lines) => lines,
            CartPayload::Envelope(envelope) => envelope.items.into_lines(),
        }
    }
}

/// Decodes a cart response body into a normalized cart.
///
/// Fails as a whole if the shape is unknown or any single line is invalid;
/// a partially loaded cart would silently drop items the customer chose.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use storefront_core::wire::decode_cart;
///
/// let cart = decode_cart(json!({"itens": [{
///     "id": 5, "nome": "X", "quantidade": 1, "sku": "S1",
///     "url_imagem": "u", "observacao": "", "valor_unitario": 9.9
/// }]})).unwrap();
/// assert_eq!(cart.get(5).unwrap().unit_price.cents(), 990);
/// ```
pub fn decode_cart(body: Value) -> CoreResult<Cart> {
    let payload: CartPayload =
        serde_json::from_value(body).map_err(|e| CoreError::InvalidPayload(e.to_string()))?;

    let lines = payload
        .into_lines()
        .into_iter()
        .map(CartLine::try_from)
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(normalize_by_id(lines))
}

// =============================================================================
// Checkout Body (POST)
// =============================================================================

#[derive(Debug, Serialize)]
struct CheckoutBody<'a> {
    items: Vec<LineDto>,
    #[serde(rename = "userInfo")]
    user_info: &'a Value,
}

/// Encodes a checkout request as the backend's JSON body.
pub fn encode_checkout(request: &CheckoutRequest) -> CoreResult<Value> {
    let body = CheckoutBody {
        items: request.items.iter().map(LineDto::from).collect(),
        user_info: &request.user_info,
    };

    serde_json::to_value(body).map_err(|e| CoreError::InvalidPayload(e.to_string()))
}

/// Extracts the order identifier from a checkout response.
///
/// Looks at [`ORDER_ID_KEYS`] on the top-level object, then inside a `data`
/// envelope. Accepts non-empty strings and integers.
pub fn decode_order_id(body: &Value) -> CoreResult<String> {
    order_id_in(body)
        .or_else(|| body.get("data").and_then(order_id_in))
        .ok_or(CoreError::MissingOrderId)
}

fn order_id_in(value: &Value) -> Option<String> {
    let object = value.as_object()?;

    ORDER_ID_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
