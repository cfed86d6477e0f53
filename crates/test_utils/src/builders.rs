//! Test Data Builders
//!
//! Builders that describe a quote request once and then replay it against a
//! workflow controller, a bare draft, or a service session. Tests specify only
//! the fields they care about and inherit sensible defaults for the rest.

use std::sync::Arc;

use core_kernel::SessionId;
use domain_quote::{
    FieldSet, FieldValue, InMemoryQuoteLedger, ProductCatalog, QuoteDraft, QuoteError,
    QuoteLedger, QuotePrinter, QuoteWorkflowService, StagingEntity, WorkflowController,
};
use rust_decimal::Decimal;

use crate::doubles::RecordingPrinter;
use crate::fixtures::{ClientDetails, ClientFixtures, EntityFixtures, ProductFixtures};

/// Agent name stamped on quotes built through these helpers
pub const TEST_AGENT: &str = "Test Agent";

/// Builder for a complete quote request
#[derive(Debug, Clone)]
pub struct QuoteRequestBuilder {
    product: String,
    client: ClientDetails,
    fields: Vec<(String, FieldValue)>,
    entities: Vec<StagingEntity>,
    terms_accepted: bool,
}

impl QuoteRequestBuilder {
    /// Starts an empty request for `product` with Jane's contact details
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            client: ClientFixtures::jane(),
            fields: Vec::new(),
            entities: Vec::new(),
            terms_accepted: false,
        }
    }

    /// Private motor request for a car of the given value
    pub fn private_motor(value: Decimal) -> Self {
        Self::new(ProductFixtures::PRIVATE_MOTOR)
            .with_field("make", "Toyota")
            .with_field("model", "Toyota Model 1")
            .with_field("year", "2020")
            .with_field("value", value.to_string())
    }

    /// Motor commercial request with one vehicle per value
    pub fn motor_commercial(vehicle_values: &[Decimal]) -> Self {
        let mut builder = Self::new(ProductFixtures::MOTOR_COMMERCIAL)
            .with_field("business_name", "Jane Logistics Ltd")
            .with_field("fleet_usage", "Own Goods")
            .accept_terms();
        for (index, value) in vehicle_values.iter().enumerate() {
            let registration = format!("KCA {:03}A", index + 1);
            builder = builder.with_entity(EntityFixtures::vehicle(&registration, *value));
        }
        builder
    }

    /// Marine cargo request with one cargo item per value
    pub fn marine_cargo(item_values: &[Decimal]) -> Self {
        let mut builder = Self::new(ProductFixtures::MARINE_CARGO)
            .with_field("vessel_name", "MV Mombasa Star")
            .with_field("port_of_loading", "Mombasa")
            .with_field("port_of_discharge", "Jebel Ali")
            .with_field("shipment_date", "2024-03-01")
            .accept_terms();
        for (index, value) in item_values.iter().enumerate() {
            let description = format!("Consignment {}", index + 1);
            builder = builder.with_entity(EntityFixtures::cargo_item(&description, *value));
        }
        builder
    }

    /// Sports cover request for a team
    pub fn sports_cover(participants: u32) -> Self {
        Self::new(ProductFixtures::SPORTS_COVER)
            .with_field("sport", "Rugby")
            .with_field("participants", participants.to_string())
            .accept_terms()
    }

    pub fn with_client(mut self, client: ClientDetails) -> Self {
        self.client = client;
        self
    }

    /// Sets a field, replacing any earlier value for the same name
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.retain(|(existing, _)| existing != name);
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn without_field(mut self, name: &str) -> Self {
        self.fields.retain(|(existing, _)| existing != name);
        self
    }

    pub fn with_entity(mut self, entity: StagingEntity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn accept_terms(mut self) -> Self {
        self.terms_accepted = true;
        self
    }

    pub fn decline_terms(mut self) -> Self {
        self.terms_accepted = false;
        self
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    fn contact_fields(&self) -> [(&'static str, FieldValue); 3] {
        [
            ("name", FieldValue::text(&self.client.name)),
            ("phone", FieldValue::text(&self.client.phone)),
            ("email", FieldValue::text(&self.client.email)),
        ]
    }

    /// Replays the request through the controller, stopping before submit
    pub fn apply(&self, controller: &mut WorkflowController) -> Result<(), QuoteError> {
        controller.select_product(&self.product)?;
        controller.open_form()?;

        for (name, value) in self.contact_fields() {
            controller.set_field(name, value)?;
        }
        for (name, value) in &self.fields {
            controller.set_field(name, value.clone())?;
        }
        for entity in &self.entities {
            for (name, value) in entity.values() {
                controller.stage_field(name, value.clone())?;
            }
            controller.add_staged_entity()?;
        }
        if self.terms_accepted {
            controller.set_terms_accepted(true)?;
        }
        Ok(())
    }

    /// A controller on the standard catalog with the request filled in
    pub fn controller(&self) -> Result<WorkflowController, QuoteError> {
        let mut controller = WorkflowController::new(ProductFixtures::catalog(), TEST_AGENT);
        self.apply(&mut controller)?;
        Ok(controller)
    }

    /// Builds the draft directly, bypassing the controller
    ///
    /// Panics if the product is unknown, has no form, or an entity is rejected.
    pub fn build_draft(&self, catalog: &ProductCatalog) -> QuoteDraft {
        let definition = catalog.lookup(&self.product).expect("product should exist");
        let kind = definition.field_set.expect("product should have a form");
        let mut draft = QuoteDraft::new(definition.key.clone(), kind, catalog.currency());

        for (name, value) in self.contact_fields() {
            draft.set_field(name, value);
        }
        for (name, value) in &self.fields {
            draft.set_field(name.clone(), value.clone());
        }
        if let Some(spec) = kind.collection() {
            for entity in &self.entities {
                draft.add_entity(spec, entity).expect("fixture entity should be complete");
            }
        }
        draft.set_terms_accepted(self.terms_accepted);
        draft
    }

    /// Opens a service session, fills in the request and submits it
    pub async fn submit_in(&self, service: &QuoteWorkflowService) -> Result<SessionId, QuoteError> {
        let (id, handle) = service.open_session().await;
        let mut controller = handle.lock().await;
        self.apply(&mut controller)?;
        controller.submit()?;
        Ok(id)
    }
}

/// Builder for a workflow service wired to test adapters
pub struct TestServiceBuilder {
    ledger: Arc<dyn QuoteLedger>,
    printer: Arc<dyn QuotePrinter>,
    agent: String,
    session_ttl: Option<chrono::Duration>,
}

impl Default for TestServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServiceBuilder {
    /// In-memory ledger and a recording printer
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(InMemoryQuoteLedger::new()),
            printer: Arc::new(RecordingPrinter::new()),
            agent: TEST_AGENT.to_string(),
            session_ttl: None,
        }
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn QuoteLedger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_printer(mut self, printer: Arc<dyn QuotePrinter>) -> Self {
        self.printer = printer;
        self
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    pub fn with_session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    pub fn build(self) -> QuoteWorkflowService {
        let service =
            QuoteWorkflowService::new(ProductFixtures::catalog(), self.ledger, self.printer, self.agent);
        match self.session_ttl {
            Some(ttl) => service.with_session_ttl(ttl),
            None => service,
        }
    }
}
