use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        chat::{AskRequest, ChatReply, ReplyKind},
        orders::{
            CartLine, CreateOrderRequest, CustomerInfo, OrderWithLines, RecordPaymentRequest,
            SaleList, SaleRow, SalesPeriodQuery, UpdateOrderStatusRequest,
        },
        products::{LowStockQuery, ProductFilter, ProductList},
        support::SubmitQuestionRequest,
    },
    models::{
        Order, OrderLine, OrderStatus, Payment, PaymentStatus, Product, QuestionStatus,
        SupportQuestion,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin::{inventory, sales},
        chat, health, orders, products, support,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Autopartes Verese",
        description = "Chat assistant, catalog and checkout API for an auto-parts store"
    ),
    paths(
        health::health_check,
        chat::ask,
        products::list_products,
        orders::create_order,
        orders::record_payment,
        support::submit_question,
        inventory::low_stock_report,
        sales::update_order_status,
        sales::sales_report
    ),
    components(
        schemas(
            Product,
            Order,
            OrderLine,
            OrderStatus,
            Payment,
            PaymentStatus,
            SupportQuestion,
            QuestionStatus,
            AskRequest,
            ChatReply,
            ReplyKind,
            CustomerInfo,
            CartLine,
            CreateOrderRequest,
            RecordPaymentRequest,
            UpdateOrderStatusRequest,
            OrderWithLines,
            SaleRow,
            SaleList,
            SalesPeriodQuery,
            ProductFilter,
            LowStockQuery,
            ProductList,
            SubmitQuestionRequest,
            Meta,
            ApiResponse<ChatReply>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<Payment>,
            ApiResponse<Order>,
            ApiResponse<SaleList>,
            ApiResponse<SupportQuestion>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Chat", description = "Chat assistant"),
        (name = "Products", description = "Public catalog"),
        (name = "Orders", description = "Checkout and payment registration"),
        (name = "Support", description = "Questions the assistant could not answer"),
        (name = "Admin", description = "Backoffice JSON endpoints (session cookie required)"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
