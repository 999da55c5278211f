
// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - appointment_api: HTTP scenarios against the router
// - google_calendar_mock: Recording calendar client and booking flow tests
// - smoke_tests: Basic configuration and wiring checks
