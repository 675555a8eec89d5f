mod profiler;
