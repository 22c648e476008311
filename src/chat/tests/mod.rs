//! Unit tests for the chat context.

mod room_tests;
