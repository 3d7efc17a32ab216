mod query_controller_tests;
