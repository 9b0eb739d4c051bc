mod trace_tests;
